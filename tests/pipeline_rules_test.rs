//! Pipeline rule engine exercised through the public crate API: stage
//! transitions, deal valuation and cadence date arithmetic.

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crmserver::crm::cadence::{elapsed_paused_days, schedule_steps};
use crmserver::crm::stages::{
    is_forward_transition, next_stage, previous_stage, validate_stage_transition,
    TransitionDenial, HIGH_CONFIDENCE_PROBABILITY,
};
use crmserver::crm::value::{apply_discount, calculate_deal_value};
use crmserver::shared::models::{
    CrmCadenceStep, CrmDeal, CrmDealProduct, CrmPipelineStage, DealStatus, LeadCadenceStatus,
};

fn deal(owner_id: Uuid) -> CrmDeal {
    let now = Utc::now();
    CrmDeal {
        id: Uuid::new_v4(),
        title: "Platform subscription".to_string(),
        description: None,
        value: 0.0,
        currency: "USD".to_string(),
        status: DealStatus::Open.as_str().to_string(),
        stage_id: None,
        probability: 0,
        contact_id: None,
        organization_id: None,
        expected_close_date: None,
        owner_id,
        closed_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn stage(pipeline_id: Uuid, stage_order: i32, probability: i32) -> CrmPipelineStage {
    CrmPipelineStage {
        id: Uuid::new_v4(),
        pipeline_id,
        name: format!("Stage {stage_order}"),
        stage_order,
        probability,
        is_won: false,
        is_lost: false,
        created_at: Utc::now(),
    }
}

fn product(deal_id: Uuid, quantity: i32, unit_price: f64, discount: f64) -> CrmDealProduct {
    CrmDealProduct {
        id: Uuid::new_v4(),
        deal_id,
        name: "Seat license".to_string(),
        quantity,
        unit_price,
        discount,
        position: 0,
        created_at: Utc::now(),
    }
}

fn step(cadence_id: Uuid, day_offset: i32, step_order: i32) -> CrmCadenceStep {
    CrmCadenceStep {
        id: Uuid::new_v4(),
        cadence_id,
        day_offset,
        step_order,
        channel: "email".to_string(),
        subject: format!("Touch {step_order}"),
        description: None,
        created_at: Utc::now(),
    }
}

#[test]
fn won_deal_is_denied_every_stage() {
    let pipeline_id = Uuid::new_v4();
    let stages: Vec<_> = (1..=5).map(|n| stage(pipeline_id, n, n * 20)).collect();
    let mut won = deal(Uuid::new_v4());
    won.stage_id = Some(stages[4].id);
    won.status = DealStatus::Won.as_str().to_string();
    won.organization_id = Some(Uuid::new_v4());

    for target in &stages {
        let check = validate_stage_transition(&won, target);
        assert!(!check.valid);
        assert_eq!(check.reason, Some(TransitionDenial::DealAlreadyClosed));
    }
}

#[test]
fn unlinked_deal_cannot_enter_high_confidence_stage() {
    let pipeline_id = Uuid::new_v4();
    let low = stage(pipeline_id, 1, 10);
    let high = stage(pipeline_id, 4, HIGH_CONFIDENCE_PROBABILITY + 5);
    let mut open = deal(Uuid::new_v4());
    open.stage_id = Some(low.id);

    let check = validate_stage_transition(&open, &high);
    assert_eq!(
        check.reason,
        Some(TransitionDenial::RequiresContactOrOrganization)
    );

    open.contact_id = Some(Uuid::new_v4());
    assert!(validate_stage_transition(&open, &high).valid);
}

#[test]
fn stage_navigation_follows_pipeline_order() {
    let pipeline_id = Uuid::new_v4();
    let s1 = stage(pipeline_id, 1, 10);
    let s2 = stage(pipeline_id, 2, 40);
    let s3 = stage(pipeline_id, 3, 80);
    let stages = vec![s1.clone(), s2.clone(), s3.clone()];

    assert!(is_forward_transition(&s1, &s3));
    assert!(!is_forward_transition(&s3, &s1));
    assert_eq!(next_stage(&s2, &stages).map(|s| s.id), Some(s3.id));
    assert_eq!(next_stage(&s3, &stages), None);
    assert_eq!(previous_stage(&s2, &stages).map(|s| s.id), Some(s1.id));
    assert_eq!(previous_stage(&s1, &stages), None);
}

#[test]
fn deal_value_matches_line_items_or_flat_value() {
    let mut flat = deal(Uuid::new_v4());
    flat.value = 1000.0;
    assert_eq!(calculate_deal_value(&flat, &[]), 1000.0);

    let products = vec![product(flat.id, 2, 100.0, 0.0), product(flat.id, 1, 500.0, 0.0)];
    assert_eq!(calculate_deal_value(&flat, &products), 700.0);

    assert_eq!(apply_discount(1000.0, 20.0), 800.0);
    assert_eq!(apply_discount(700.0, 100.0), 0.0);
}

#[test]
fn cadence_schedule_spans_day_offsets() {
    let cadence_id = Uuid::new_v4();
    let steps = vec![step(cadence_id, 1, 1), step(cadence_id, 3, 2), step(cadence_id, 7, 3)];
    let start = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();

    let schedule = schedule_steps(&steps, start);
    assert_eq!(schedule.len(), 3);
    assert_eq!(schedule[0].1, start);
    assert_eq!(schedule[1].1, start + Duration::days(2));
    assert_eq!(schedule[2].1, start + Duration::days(6));
}

#[test]
fn five_elapsed_days_shift_by_five() {
    let paused_at = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();
    assert_eq!(elapsed_paused_days(paused_at + Duration::days(5), paused_at), 5);
}

#[test]
fn terminal_cadence_states_refuse_every_follow_up() {
    for terminal in [LeadCadenceStatus::Cancelled, LeadCadenceStatus::Completed] {
        for next in [
            LeadCadenceStatus::Active,
            LeadCadenceStatus::Paused,
            LeadCadenceStatus::Cancelled,
            LeadCadenceStatus::Completed,
        ] {
            assert!(!terminal.can_transition_to(next));
        }
    }
}
