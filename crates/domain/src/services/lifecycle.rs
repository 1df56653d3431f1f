//! Reservation lifecycle planner.
//!
//! `plan_transition` is pure: given the locked reservation, the locked tables
//! involved and a staff action, it decides the new reservation state, the
//! table status writes and the guest email to send. Callers apply the plan
//! inside a single database transaction and only then send the notice.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use crate::models::reservation::{Reservation, ReservationStatus, TableChange, UpdateReservationRequest};
use crate::models::table::{RestaurantTable, TableStatus};
use crate::services::notification::{ConfirmationNotice, GuestNotice, RejectionNotice};

/// Lifecycle rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Cannot {action} a reservation that is {from}")]
    InvalidTransition {
        from: ReservationStatus,
        action: &'static str,
    },

    #[error("A table must be assigned before the reservation can be confirmed")]
    NoTableAssigned,

    #[error("Table not found: {0}")]
    TableNotFound(Uuid),

    #[error("Table {number} is {status}")]
    TableUnavailable { number: i32, status: TableStatus },

    #[error("Table {number} seats {capacity} but the party has {guests} guests")]
    InsufficientCapacity {
        number: i32,
        capacity: i32,
        guests: i32,
    },

    #[error("Arrived reservations cannot be edited")]
    ArrivedReservationLocked,

    #[error("The table of a confirmed reservation cannot be removed")]
    CannotClearAcceptedTable,

    #[error("The table of a cancelled reservation cannot be changed")]
    CancelledTableChange,
}

/// A staff action on an existing reservation.
#[derive(Debug, Clone)]
pub enum ReservationAction {
    AssignTable(Uuid),
    Confirm,
    Cancel,
    MarkArrived,
    Edit(UpdateReservationRequest),
}

impl ReservationAction {
    pub fn name(&self) -> &'static str {
        match self {
            ReservationAction::AssignTable(_) => "assign_table",
            ReservationAction::Confirm => "confirm",
            ReservationAction::Cancel => "cancel",
            ReservationAction::MarkArrived => "mark_arrived",
            ReservationAction::Edit(_) => "edit",
        }
    }

    /// Table the action wants to move the reservation to, if any.
    pub fn target_table(&self) -> Option<Uuid> {
        match self {
            ReservationAction::AssignTable(id) => Some(*id),
            ReservationAction::Edit(edit) => match edit.table_id {
                TableChange::Assign(id) => Some(id),
                _ => None,
            },
            _ => None,
        }
    }

    /// Tables that must be locked before planning, in a stable order.
    pub fn tables_to_lock(&self, current: &Reservation) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = current.table_id.into_iter().chain(self.target_table()).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

/// A single table status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStatusChange {
    pub table_id: Uuid,
    pub status: TableStatus,
}

/// Outcome of planning an action.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub status: ReservationStatus,
    pub table_id: Option<Uuid>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guests: i32,
    /// Table writes in the order they must be applied.
    pub table_updates: Vec<TableStatusChange>,
    pub notice: Option<GuestNotice>,
    changed: bool,
}

impl TransitionPlan {
    fn unchanged(current: &Reservation) -> Self {
        Self {
            status: current.status,
            table_id: current.table_id,
            date: current.date,
            time: current.time,
            guests: current.guests,
            table_updates: Vec::new(),
            notice: None,
            changed: false,
        }
    }

    /// True when applying the plan would not change anything.
    pub fn is_noop(&self) -> bool {
        !self.changed
    }

    fn release(&mut self, table_id: Option<Uuid>) {
        if let Some(id) = table_id {
            self.table_updates.push(TableStatusChange {
                table_id: id,
                status: TableStatus::Available,
            });
        }
    }

    fn set_table(&mut self, table_id: Uuid, status: TableStatus) {
        self.table_updates.push(TableStatusChange { table_id, status });
    }
}

fn find_table(tables: &[RestaurantTable], id: Uuid) -> Result<&RestaurantTable, LifecycleError> {
    tables
        .iter()
        .find(|t| t.id == id)
        .ok_or(LifecycleError::TableNotFound(id))
}

fn check_capacity(table: &RestaurantTable, guests: i32) -> Result<(), LifecycleError> {
    if table.seats(guests) {
        Ok(())
    } else {
        Err(LifecycleError::InsufficientCapacity {
            number: table.number,
            capacity: table.capacity,
            guests,
        })
    }
}

/// Checks that `target` can take over a party of `guests`.
fn check_assignable(target: &RestaurantTable, guests: i32) -> Result<(), LifecycleError> {
    if target.status != TableStatus::Available {
        return Err(LifecycleError::TableUnavailable {
            number: target.number,
            status: target.status,
        });
    }
    check_capacity(target, guests)
}

fn invalid(from: ReservationStatus, action: &ReservationAction) -> LifecycleError {
    LifecycleError::InvalidTransition {
        from,
        action: action.name(),
    }
}

/// Plans `action` against the locked reservation and tables.
///
/// `tables` must contain the reservation's current table and the target
/// table of the action, if any.
pub fn plan_transition(
    current: &Reservation,
    action: &ReservationAction,
    tables: &[RestaurantTable],
) -> Result<TransitionPlan, LifecycleError> {
    let mut plan = TransitionPlan::unchanged(current);

    match action {
        ReservationAction::AssignTable(target_id) => {
            if !matches!(
                current.status,
                ReservationStatus::Pending | ReservationStatus::Accepted
            ) {
                return Err(invalid(current.status, action));
            }
            if current.table_id == Some(*target_id) {
                return Ok(plan);
            }

            let target = find_table(tables, *target_id)?;
            check_assignable(target, current.guests)?;

            plan.release(current.table_id);
            plan.set_table(target.id, TableStatus::Reserved);
            plan.table_id = Some(target.id);
            plan.changed = true;
        }

        ReservationAction::Confirm => match current.status {
            ReservationStatus::Accepted => {}
            ReservationStatus::Pending => {
                let table_id = current.table_id.ok_or(LifecycleError::NoTableAssigned)?;
                let table = find_table(tables, table_id)?;

                plan.status = ReservationStatus::Accepted;
                plan.set_table(table.id, TableStatus::Reserved);
                plan.notice = Some(GuestNotice::Confirmation(ConfirmationNotice {
                    to: current.email.clone(),
                    first_name: current.first_name.clone(),
                    last_name: current.last_name.clone(),
                    date: current.date,
                    time: current.time,
                    table: table.describe(),
                }));
                plan.changed = true;
            }
            other => return Err(invalid(other, action)),
        },

        ReservationAction::Cancel => match current.status {
            ReservationStatus::Cancelled => {}
            ReservationStatus::Pending | ReservationStatus::Accepted => {
                plan.status = ReservationStatus::Cancelled;
                plan.release(current.table_id);
                plan.table_id = None;
                plan.notice = Some(GuestNotice::Rejection(RejectionNotice {
                    to: current.email.clone(),
                    first_name: current.first_name.clone(),
                    last_name: current.last_name.clone(),
                    name: None,
                    date: current.date,
                    time: current.time,
                }));
                plan.changed = true;
            }
            other => return Err(invalid(other, action)),
        },

        ReservationAction::MarkArrived => match current.status {
            ReservationStatus::Arrived => {}
            ReservationStatus::Accepted => {
                let table_id = current.table_id.ok_or(LifecycleError::NoTableAssigned)?;
                plan.status = ReservationStatus::Arrived;
                plan.set_table(table_id, TableStatus::Occupied);
                plan.changed = true;
            }
            other => return Err(invalid(other, action)),
        },

        ReservationAction::Edit(edit) => {
            plan_edit(current, edit, tables, &mut plan)?;
        }
    }

    Ok(plan)
}

fn plan_edit(
    current: &Reservation,
    edit: &UpdateReservationRequest,
    tables: &[RestaurantTable],
    plan: &mut TransitionPlan,
) -> Result<(), LifecycleError> {
    if current.status == ReservationStatus::Arrived {
        return Err(LifecycleError::ArrivedReservationLocked);
    }

    plan.date = edit.date.unwrap_or(current.date);
    plan.time = edit.time.unwrap_or(current.time);
    plan.guests = edit.guests.unwrap_or(current.guests);

    let change = match edit.table_id {
        TableChange::Assign(id) if current.table_id == Some(id) => TableChange::Keep,
        TableChange::Clear if current.table_id.is_none() => TableChange::Keep,
        other => other,
    };

    match change {
        TableChange::Keep => {
            if let Some(table_id) = current.table_id {
                if plan.guests != current.guests {
                    check_capacity(find_table(tables, table_id)?, plan.guests)?;
                }
            }
        }
        TableChange::Assign(target_id) => {
            if current.status == ReservationStatus::Cancelled {
                return Err(LifecycleError::CancelledTableChange);
            }
            let target = find_table(tables, target_id)?;
            check_assignable(target, plan.guests)?;

            plan.release(current.table_id);
            plan.set_table(target.id, TableStatus::Reserved);
            plan.table_id = Some(target.id);
        }
        TableChange::Clear => {
            match current.status {
                ReservationStatus::Accepted => return Err(LifecycleError::CannotClearAcceptedTable),
                ReservationStatus::Cancelled => return Err(LifecycleError::CancelledTableChange),
                _ => {}
            }
            plan.release(current.table_id);
            plan.table_id = None;
        }
    }

    plan.changed = plan.date != current.date
        || plan.time != current.time
        || plan.guests != current.guests
        || plan.table_id != current.table_id;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn table(number: i32, capacity: i32, status: TableStatus) -> RestaurantTable {
        RestaurantTable {
            id: Uuid::new_v4(),
            number,
            capacity,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn reservation(status: ReservationStatus, table_id: Option<Uuid>) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: None,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            guests: 2,
            remark: None,
            status,
            table_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn change(table: &RestaurantTable, status: TableStatus) -> TableStatusChange {
        TableStatusChange {
            table_id: table.id,
            status,
        }
    }

    /// Applies a plan to in-memory copies, the way the database would.
    fn apply(
        mut res: Reservation,
        tables: &mut [RestaurantTable],
        plan: &TransitionPlan,
    ) -> Reservation {
        res.status = plan.status;
        res.table_id = plan.table_id;
        res.date = plan.date;
        res.time = plan.time;
        res.guests = plan.guests;
        for update in &plan.table_updates {
            if let Some(t) = tables.iter_mut().find(|t| t.id == update.table_id) {
                t.status = update.status;
            }
        }
        res
    }

    #[test]
    fn test_assign_table_to_pending() {
        let t4 = table(4, 4, TableStatus::Available);
        let res = reservation(ReservationStatus::Pending, None);

        let plan =
            plan_transition(&res, &ReservationAction::AssignTable(t4.id), &[t4.clone()]).unwrap();

        assert_eq!(plan.status, ReservationStatus::Pending);
        assert_eq!(plan.table_id, Some(t4.id));
        assert_eq!(plan.table_updates, vec![change(&t4, TableStatus::Reserved)]);
        assert!(plan.notice.is_none());
        assert!(!plan.is_noop());
    }

    #[test]
    fn test_reassign_frees_previous_table_first() {
        let old = table(2, 2, TableStatus::Reserved);
        let new = table(5, 6, TableStatus::Available);
        let res = reservation(ReservationStatus::Accepted, Some(old.id));

        let plan = plan_transition(
            &res,
            &ReservationAction::AssignTable(new.id),
            &[old.clone(), new.clone()],
        )
        .unwrap();

        assert_eq!(
            plan.table_updates,
            vec![
                change(&old, TableStatus::Available),
                change(&new, TableStatus::Reserved)
            ]
        );
        assert_eq!(plan.status, ReservationStatus::Accepted);
    }

    #[test]
    fn test_assign_same_table_is_noop() {
        let t4 = table(4, 4, TableStatus::Reserved);
        let res = reservation(ReservationStatus::Pending, Some(t4.id));

        let plan =
            plan_transition(&res, &ReservationAction::AssignTable(t4.id), &[t4.clone()]).unwrap();
        assert!(plan.is_noop());
        assert!(plan.table_updates.is_empty());
    }

    #[test]
    fn test_assign_unavailable_table_rejected() {
        let taken = table(3, 4, TableStatus::Reserved);
        let res = reservation(ReservationStatus::Pending, None);

        let err = plan_transition(&res, &ReservationAction::AssignTable(taken.id), &[taken])
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::TableUnavailable {
                number: 3,
                status: TableStatus::Reserved
            }
        );
    }

    #[test]
    fn test_assign_too_small_table_rejected() {
        let small = table(1, 2, TableStatus::Available);
        let mut res = reservation(ReservationStatus::Pending, None);
        res.guests = 3;

        let err = plan_transition(&res, &ReservationAction::AssignTable(small.id), &[small])
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InsufficientCapacity { guests: 3, .. }));
    }

    #[test]
    fn test_assign_missing_table() {
        let res = reservation(ReservationStatus::Pending, None);
        let id = Uuid::new_v4();
        assert_eq!(
            plan_transition(&res, &ReservationAction::AssignTable(id), &[]),
            Err(LifecycleError::TableNotFound(id))
        );
    }

    #[test]
    fn test_assign_on_terminal_reservation_rejected() {
        let t = table(1, 4, TableStatus::Available);
        for status in [ReservationStatus::Cancelled, ReservationStatus::Arrived] {
            let res = reservation(status, None);
            let err = plan_transition(&res, &ReservationAction::AssignTable(t.id), &[t.clone()])
                .unwrap_err();
            assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn test_confirm_requires_table() {
        let res = reservation(ReservationStatus::Pending, None);
        assert_eq!(
            plan_transition(&res, &ReservationAction::Confirm, &[]),
            Err(LifecycleError::NoTableAssigned)
        );
    }

    #[test]
    fn test_confirm_with_table() {
        let t4 = table(4, 4, TableStatus::Reserved);
        let res = reservation(ReservationStatus::Pending, Some(t4.id));

        let plan = plan_transition(&res, &ReservationAction::Confirm, &[t4.clone()]).unwrap();

        assert_eq!(plan.status, ReservationStatus::Accepted);
        assert_eq!(plan.table_updates, vec![change(&t4, TableStatus::Reserved)]);
        match plan.notice {
            Some(GuestNotice::Confirmation(notice)) => {
                assert_eq!(notice.to, "jane@x.com");
                assert_eq!(notice.table, "Table 4 (4 seats)");
            }
            other => panic!("expected confirmation notice, got {:?}", other),
        }
    }

    #[test]
    fn test_confirm_twice_is_noop() {
        let t4 = table(4, 4, TableStatus::Reserved);
        let res = reservation(ReservationStatus::Accepted, Some(t4.id));

        let plan = plan_transition(&res, &ReservationAction::Confirm, &[t4]).unwrap();
        assert!(plan.is_noop());
        assert!(plan.notice.is_none());
    }

    #[test]
    fn test_confirm_cancelled_rejected() {
        let res = reservation(ReservationStatus::Cancelled, None);
        let err = plan_transition(&res, &ReservationAction::Confirm, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Cannot confirm a reservation that is cancelled");
    }

    #[test]
    fn test_cancel_frees_table_and_notifies() {
        let t4 = table(4, 4, TableStatus::Reserved);
        let res = reservation(ReservationStatus::Accepted, Some(t4.id));

        let plan = plan_transition(&res, &ReservationAction::Cancel, &[t4.clone()]).unwrap();

        assert_eq!(plan.status, ReservationStatus::Cancelled);
        assert_eq!(plan.table_id, None);
        assert_eq!(plan.table_updates, vec![change(&t4, TableStatus::Available)]);
        assert!(matches!(plan.notice, Some(GuestNotice::Rejection(_))));
    }

    #[test]
    fn test_cancel_without_table() {
        let res = reservation(ReservationStatus::Pending, None);
        let plan = plan_transition(&res, &ReservationAction::Cancel, &[]).unwrap();
        assert!(plan.table_updates.is_empty());
        assert!(plan.notice.is_some());
    }

    #[test]
    fn test_cancel_twice_is_noop() {
        let res = reservation(ReservationStatus::Cancelled, None);
        let plan = plan_transition(&res, &ReservationAction::Cancel, &[]).unwrap();
        assert!(plan.is_noop());
        assert!(plan.notice.is_none());
    }

    #[test]
    fn test_cancel_arrived_rejected() {
        let res = reservation(ReservationStatus::Arrived, Some(Uuid::new_v4()));
        assert!(matches!(
            plan_transition(&res, &ReservationAction::Cancel, &[]),
            Err(LifecycleError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_mark_arrived() {
        let t4 = table(4, 4, TableStatus::Reserved);
        let res = reservation(ReservationStatus::Accepted, Some(t4.id));

        let plan = plan_transition(&res, &ReservationAction::MarkArrived, &[t4.clone()]).unwrap();
        assert_eq!(plan.status, ReservationStatus::Arrived);
        assert_eq!(plan.table_updates, vec![change(&t4, TableStatus::Occupied)]);
        assert!(plan.notice.is_none());
    }

    #[test]
    fn test_mark_arrived_requires_accepted() {
        let res = reservation(ReservationStatus::Pending, Some(Uuid::new_v4()));
        let err = plan_transition(&res, &ReservationAction::MarkArrived, &[]).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: ReservationStatus::Pending,
                action: "mark_arrived"
            }
        );
    }

    #[test]
    fn test_edit_date_time_guests() {
        let t4 = table(4, 4, TableStatus::Reserved);
        let res = reservation(ReservationStatus::Accepted, Some(t4.id));
        let edit = UpdateReservationRequest {
            date: NaiveDate::from_ymd_opt(2025, 6, 2),
            time: NaiveTime::from_hms_opt(20, 30, 0),
            guests: Some(4),
            table_id: TableChange::Keep,
        };

        let plan = plan_transition(&res, &ReservationAction::Edit(edit), &[t4]).unwrap();
        assert_eq!(plan.guests, 4);
        assert_eq!(plan.date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert!(plan.table_updates.is_empty());
        assert!(!plan.is_noop());
    }

    #[test]
    fn test_edit_guests_beyond_kept_table_capacity() {
        let t4 = table(4, 4, TableStatus::Reserved);
        let res = reservation(ReservationStatus::Pending, Some(t4.id));
        let edit = UpdateReservationRequest {
            guests: Some(6),
            ..Default::default()
        };

        assert!(matches!(
            plan_transition(&res, &ReservationAction::Edit(edit), &[t4]),
            Err(LifecycleError::InsufficientCapacity { .. })
        ));
    }

    #[test]
    fn test_edit_moves_table_with_new_guest_count() {
        let old = table(2, 2, TableStatus::Reserved);
        let new = table(8, 8, TableStatus::Available);
        let res = reservation(ReservationStatus::Accepted, Some(old.id));
        let edit = UpdateReservationRequest {
            guests: Some(7),
            table_id: TableChange::Assign(new.id),
            ..Default::default()
        };

        let plan = plan_transition(
            &res,
            &ReservationAction::Edit(edit),
            &[old.clone(), new.clone()],
        )
        .unwrap();
        assert_eq!(plan.table_id, Some(new.id));
        assert_eq!(
            plan.table_updates,
            vec![
                change(&old, TableStatus::Available),
                change(&new, TableStatus::Reserved)
            ]
        );
    }

    #[test]
    fn test_edit_clear_table_on_pending() {
        let t = table(2, 2, TableStatus::Reserved);
        let res = reservation(ReservationStatus::Pending, Some(t.id));
        let edit = UpdateReservationRequest {
            table_id: TableChange::Clear,
            ..Default::default()
        };

        let plan = plan_transition(&res, &ReservationAction::Edit(edit), &[t.clone()]).unwrap();
        assert_eq!(plan.table_id, None);
        assert_eq!(plan.table_updates, vec![change(&t, TableStatus::Available)]);
    }

    #[test]
    fn test_edit_clear_table_on_accepted_rejected() {
        let t = table(2, 2, TableStatus::Reserved);
        let res = reservation(ReservationStatus::Accepted, Some(t.id));
        let edit = UpdateReservationRequest {
            table_id: TableChange::Clear,
            ..Default::default()
        };

        assert_eq!(
            plan_transition(&res, &ReservationAction::Edit(edit), &[t]),
            Err(LifecycleError::CannotClearAcceptedTable)
        );
    }

    #[test]
    fn test_edit_cancelled_table_change_rejected() {
        let t = table(2, 2, TableStatus::Available);
        let res = reservation(ReservationStatus::Cancelled, None);
        let edit = UpdateReservationRequest {
            table_id: TableChange::Assign(t.id),
            ..Default::default()
        };

        assert_eq!(
            plan_transition(&res, &ReservationAction::Edit(edit), &[t]),
            Err(LifecycleError::CancelledTableChange)
        );
    }

    #[test]
    fn test_edit_cancelled_date_allowed() {
        let res = reservation(ReservationStatus::Cancelled, None);
        let edit = UpdateReservationRequest {
            date: NaiveDate::from_ymd_opt(2025, 7, 1),
            table_id: TableChange::Clear,
            ..Default::default()
        };

        let plan = plan_transition(&res, &ReservationAction::Edit(edit), &[]).unwrap();
        assert_eq!(plan.status, ReservationStatus::Cancelled);
        assert!(!plan.is_noop());
    }

    #[test]
    fn test_edit_arrived_rejected() {
        let res = reservation(ReservationStatus::Arrived, Some(Uuid::new_v4()));
        assert_eq!(
            plan_transition(
                &res,
                &ReservationAction::Edit(UpdateReservationRequest::default()),
                &[]
            ),
            Err(LifecycleError::ArrivedReservationLocked)
        );
    }

    #[test]
    fn test_edit_without_changes_is_noop() {
        let res = reservation(ReservationStatus::Pending, None);
        let edit = UpdateReservationRequest {
            guests: Some(res.guests),
            ..Default::default()
        };
        let plan = plan_transition(&res, &ReservationAction::Edit(edit), &[]).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn test_tables_to_lock() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let res = reservation(ReservationStatus::Pending, Some(a));

        let ids = ReservationAction::AssignTable(b).tables_to_lock(&res);
        assert_eq!(ids.len(), 2);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(ReservationAction::AssignTable(a).tables_to_lock(&res), vec![a]);
        assert_eq!(ReservationAction::Confirm.tables_to_lock(&res), vec![a]);
    }

    #[test]
    fn test_assign_confirm_cancel_scenario() {
        let mut tables = vec![table(4, 4, TableStatus::Available)];
        let t4_id = tables[0].id;
        let res = reservation(ReservationStatus::Pending, None);

        let plan = plan_transition(&res, &ReservationAction::AssignTable(t4_id), &tables).unwrap();
        let res = apply(res, &mut tables, &plan);

        let plan = plan_transition(&res, &ReservationAction::Confirm, &tables).unwrap();
        let res = apply(res, &mut tables, &plan);
        assert_eq!(res.status, ReservationStatus::Accepted);
        assert_eq!(tables[0].status, TableStatus::Reserved);

        let plan = plan_transition(&res, &ReservationAction::Cancel, &tables).unwrap();
        let res = apply(res, &mut tables, &plan);
        assert_eq!(res.status, ReservationStatus::Cancelled);
        assert_eq!(res.table_id, None);
        assert_eq!(tables[0].status, TableStatus::Available);
    }

    #[test]
    fn test_confirm_then_arrive_scenario() {
        let mut tables = vec![table(4, 4, TableStatus::Reserved)];
        let res = reservation(ReservationStatus::Pending, Some(tables[0].id));

        let plan = plan_transition(&res, &ReservationAction::Confirm, &tables).unwrap();
        let res = apply(res, &mut tables, &plan);
        let plan = plan_transition(&res, &ReservationAction::MarkArrived, &tables).unwrap();
        let res = apply(res, &mut tables, &plan);

        assert_eq!(res.status, ReservationStatus::Arrived);
        assert_eq!(tables[0].status, TableStatus::Occupied);

        let again = plan_transition(&res, &ReservationAction::MarkArrived, &tables).unwrap();
        assert!(again.is_noop());
    }
}
