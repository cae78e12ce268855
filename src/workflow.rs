//! Order lifecycle taxonomy and the transition policy.
//!
//! The tables in this module are the single source of truth for which
//! statuses a work order may move to next and which production-floor stage
//! (if any) a status corresponds to. Everything here is a pure function of
//! static tables; the transactional side effects live in
//! [`crate::services::work_orders`].

use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Customer-facing lifecycle status of a work order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "CONFIRMED")]
    Confirmed,
    #[sea_orm(string_value = "CUTTING")]
    Cutting,
    #[sea_orm(string_value = "SEWING")]
    Sewing,
    #[sea_orm(string_value = "EMBROIDERY")]
    Embroidery,
    #[sea_orm(string_value = "PRESSING")]
    Pressing,
    #[sea_orm(string_value = "QC")]
    Qc,
    #[sea_orm(string_value = "DISPATCHED")]
    Dispatched,
    #[sea_orm(string_value = "AT_BRANCH")]
    AtBranch,
    #[sea_orm(string_value = "FITTING")]
    Fitting,
    #[sea_orm(string_value = "ALTERATION")]
    Alteration,
    #[sea_orm(string_value = "READY_FOR_PICKUP")]
    ReadyForPickup,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

/// Production-floor stage tracked per item via production tasks.
///
/// A subset of statuses have a corresponding stage; intake and handover
/// statuses (NEW, CONFIRMED, READY_FOR_PICKUP, DELIVERED, CLOSED) do not.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    #[sea_orm(string_value = "CUTTING")]
    Cutting,
    #[sea_orm(string_value = "SEWING")]
    Sewing,
    #[sea_orm(string_value = "EMBROIDERY")]
    Embroidery,
    #[sea_orm(string_value = "PRESSING")]
    Pressing,
    #[sea_orm(string_value = "QC")]
    Qc,
    #[sea_orm(string_value = "DISPATCHED")]
    Dispatched,
    #[sea_orm(string_value = "AT_BRANCH")]
    AtBranch,
    #[sea_orm(string_value = "FITTING")]
    Fitting,
    #[sea_orm(string_value = "ALTERATION")]
    Alteration,
}

impl Stage {
    /// The order status this stage corresponds to (1:1).
    pub fn status(self) -> Status {
        match self {
            Stage::Cutting => Status::Cutting,
            Stage::Sewing => Status::Sewing,
            Stage::Embroidery => Status::Embroidery,
            Stage::Pressing => Status::Pressing,
            Stage::Qc => Status::Qc,
            Stage::Dispatched => Status::Dispatched,
            Stage::AtBranch => Status::AtBranch,
            Stage::Fitting => Status::Fitting,
            Stage::Alteration => Status::Alteration,
        }
    }
}

/// The fixed successor set for `current`.
///
/// Branch points (SEWING, QC, AT_BRANCH, FITTING, ALTERATION) are multi-way;
/// choosing among the legal next statuses is an operator decision, not
/// computed here.
pub fn next_statuses(current: Status) -> &'static [Status] {
    use Status::*;
    match current {
        New => &[Confirmed],
        Confirmed => &[Cutting],
        Cutting => &[Sewing],
        Sewing => &[Embroidery, Pressing],
        Embroidery => &[Pressing],
        Pressing => &[Qc],
        Qc => &[Dispatched, Alteration],
        Dispatched => &[AtBranch],
        AtBranch => &[Fitting, ReadyForPickup],
        Fitting => &[Alteration, ReadyForPickup],
        Alteration => &[Fitting, ReadyForPickup],
        ReadyForPickup => &[Delivered],
        Delivered => &[Closed],
        Closed => &[],
    }
}

pub fn can_transition(current: Status, target: Status) -> bool {
    next_statuses(current).contains(&target)
}

/// The production stage a status corresponds to, if any.
pub fn stage_for(status: Status) -> Option<Stage> {
    use Status::*;
    match status {
        Cutting => Some(Stage::Cutting),
        Sewing => Some(Stage::Sewing),
        Embroidery => Some(Stage::Embroidery),
        Pressing => Some(Stage::Pressing),
        Qc => Some(Stage::Qc),
        Dispatched => Some(Stage::Dispatched),
        AtBranch => Some(Stage::AtBranch),
        Fitting => Some(Stage::Fitting),
        Alteration => Some(Stage::Alteration),
        New | Confirmed | ReadyForPickup | Delivered | Closed => None,
    }
}

/// Resolves a caller-supplied status-or-stage name to a target status.
///
/// A stage name maps to its corresponding status; anything else is rejected.
pub fn parse_target(value: &str) -> Result<Status, ServiceError> {
    if let Ok(status) = Status::from_str(value) {
        return Ok(status);
    }
    if let Ok(stage) = Stage::from_str(value) {
        return Ok(stage.status());
    }
    Err(ServiceError::InvalidTarget(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const ALL_STATUSES: [Status; 14] = [
        Status::New,
        Status::Confirmed,
        Status::Cutting,
        Status::Sewing,
        Status::Embroidery,
        Status::Pressing,
        Status::Qc,
        Status::Dispatched,
        Status::AtBranch,
        Status::Fitting,
        Status::Alteration,
        Status::ReadyForPickup,
        Status::Delivered,
        Status::Closed,
    ];

    #[test]
    fn transition_table_fidelity() {
        use Status::*;
        let expected: &[(Status, &[Status])] = &[
            (New, &[Confirmed]),
            (Confirmed, &[Cutting]),
            (Cutting, &[Sewing]),
            (Sewing, &[Embroidery, Pressing]),
            (Embroidery, &[Pressing]),
            (Pressing, &[Qc]),
            (Qc, &[Dispatched, Alteration]),
            (Dispatched, &[AtBranch]),
            (AtBranch, &[Fitting, ReadyForPickup]),
            (Fitting, &[Alteration, ReadyForPickup]),
            (Alteration, &[Fitting, ReadyForPickup]),
            (ReadyForPickup, &[Delivered]),
            (Delivered, &[Closed]),
            (Closed, &[]),
        ];

        for (current, successors) in expected {
            assert_eq!(next_statuses(*current), *successors, "from {current}");
            for target in ALL_STATUSES {
                assert_eq!(
                    can_transition(*current, target),
                    successors.contains(&target),
                    "{current} -> {target}"
                );
            }
        }
    }

    #[test]
    fn closed_is_terminal() {
        for target in ALL_STATUSES {
            assert!(!can_transition(Status::Closed, target));
        }
    }

    #[test]
    fn no_backward_transitions() {
        assert!(!can_transition(Status::Qc, Status::Sewing));
        assert!(!can_transition(Status::Delivered, Status::Fitting));
        assert!(!can_transition(Status::Sewing, Status::Cutting));
    }

    #[test]
    fn stage_mapping() {
        assert_eq!(stage_for(Status::Cutting), Some(Stage::Cutting));
        assert_eq!(stage_for(Status::Alteration), Some(Stage::Alteration));
        assert_eq!(stage_for(Status::New), None);
        assert_eq!(stage_for(Status::Confirmed), None);
        assert_eq!(stage_for(Status::ReadyForPickup), None);
        assert_eq!(stage_for(Status::Delivered), None);
        assert_eq!(stage_for(Status::Closed), None);

        for status in ALL_STATUSES {
            if let Some(stage) = stage_for(status) {
                assert_eq!(stage.status(), status);
            }
        }
    }

    #[test]
    fn parse_target_accepts_status_and_stage_names() {
        assert_eq!(parse_target("QC").unwrap(), Status::Qc);
        assert_eq!(parse_target("READY_FOR_PICKUP").unwrap(), Status::ReadyForPickup);
        // Stage names resolve to their status
        assert_eq!(parse_target("AT_BRANCH").unwrap(), Status::AtBranch);
        assert_eq!(parse_target("SEWING").unwrap(), Status::Sewing);

        assert_matches!(parse_target("IRONING"), Err(ServiceError::InvalidTarget(_)));
        assert_matches!(parse_target(""), Err(ServiceError::InvalidTarget(_)));
        // Names are case-sensitive, matching how statuses are persisted
        assert_matches!(parse_target("sewing"), Err(ServiceError::InvalidTarget(_)));
    }

    #[test]
    fn status_display_matches_wire_format() {
        assert_eq!(Status::ReadyForPickup.to_string(), "READY_FOR_PICKUP");
        assert_eq!(Status::Qc.to_string(), "QC");
        assert_eq!(Stage::AtBranch.to_string(), "AT_BRANCH");
    }
}
