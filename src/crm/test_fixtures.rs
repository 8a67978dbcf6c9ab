//! Builders for engine unit tests.

use chrono::Utc;
use uuid::Uuid;

use crate::shared::models::{
    CrmCadenceStep, CrmDeal, CrmDealProduct, CrmLead, CrmLeadContact, CrmPipelineStage,
    DealStatus, LeadStatus,
};

pub fn lead(owner_id: Uuid) -> CrmLead {
    let now = Utc::now();
    CrmLead {
        id: Uuid::new_v4(),
        company_name: "Acme Fabrication".to_string(),
        website: Some("https://acme.example".to_string()),
        industry: Some("manufacturing".to_string()),
        employee_band: Some("51-200".to_string()),
        tax_id: Some("12-3456789".to_string()),
        email: Some("hello@acme.example".to_string()),
        phone: Some("+1 555 0100".to_string()),
        address_line1: Some("12 Foundry Way".to_string()),
        address_line2: None,
        city: Some("Pittsburgh".to_string()),
        state: Some("PA".to_string()),
        postal_code: Some("15201".to_string()),
        country: Some("US".to_string()),
        source: Some("inbound".to_string()),
        status: LeadStatus::Qualified.as_str().to_string(),
        owner_id,
        converted_organization_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn lead_contact(lead_id: Uuid, is_primary: bool) -> CrmLeadContact {
    let now = Utc::now();
    CrmLeadContact {
        id: Uuid::new_v4(),
        lead_id,
        first_name: Some("Dana".to_string()),
        last_name: Some("Reeve".to_string()),
        email: Some("dana@acme.example".to_string()),
        phone: None,
        job_title: Some("COO".to_string()),
        is_primary,
        converted_contact_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn deal(owner_id: Uuid) -> CrmDeal {
    let now = Utc::now();
    CrmDeal {
        id: Uuid::new_v4(),
        title: "Pilot rollout".to_string(),
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

pub fn product(deal_id: Uuid, quantity: i32, unit_price: f64, discount: f64) -> CrmDealProduct {
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

pub fn stage(pipeline_id: Uuid, stage_order: i32, probability: i32) -> CrmPipelineStage {
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

pub fn cadence_step(cadence_id: Uuid, day_offset: i32, step_order: i32) -> CrmCadenceStep {
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
