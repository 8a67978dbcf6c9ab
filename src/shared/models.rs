use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::schema::{
    crm_activities, crm_cadence_steps, crm_cadences, crm_contacts, crm_deal_products,
    crm_deal_tech_stack, crm_deals, crm_lead_cadence_activities, crm_lead_cadences,
    crm_lead_contacts, crm_leads, crm_organization_industry_codes,
    crm_organization_product_interests, crm_organization_tech_profiles, crm_organizations,
    crm_pipeline_stages, crm_pipelines, crm_referral_partners,
};

/// Lead life-cycle. Conversion is a status change, never a deletion; once a
/// lead reaches `Converted` it must carry the id of the organization it
/// became and further conversions are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Qualified,
    Converted,
    Disqualified,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Qualified => "qualified",
            Self::Converted => "converted",
            Self::Disqualified => "disqualified",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "qualified" => Some(Self::Qualified),
            "converted" => Some(Self::Converted),
            "disqualified" => Some(Self::Disqualified),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Open,
    Won,
    Lost,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "won" => Some(Self::Won),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Template status. Only `Active` cadences may be applied to a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CadenceStatus {
    Draft,
    Active,
    Archived,
}

impl CadenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Per-lead cadence run. The transition table is the single source of truth
/// for legality; storage is only touched after a transition passes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadCadenceStatus {
    Active,
    Paused,
    Cancelled,
    Completed,
}

impl LeadCadenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Allowed moves: active⇄paused, active|paused→cancelled,
    /// active|paused→completed. Terminal states accept nothing.
    pub fn can_transition_to(self, next: Self) -> bool {
        use LeadCadenceStatus::*;
        matches!(
            (self, next),
            (Active, Paused)
                | (Paused, Active)
                | (Active, Cancelled)
                | (Paused, Cancelled)
                | (Active, Completed)
                | (Paused, Completed)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = crm_leads)]
pub struct CrmLead {
    pub id: Uuid,
    pub company_name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub employee_band: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub source: Option<String>,
    pub status: String,
    pub owner_id: Uuid,
    pub converted_organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = crm_lead_contacts)]
pub struct CrmLeadContact {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub is_primary: bool,
    pub converted_contact_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = crm_organizations)]
pub struct CrmOrganization {
    pub id: Uuid,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub employee_band: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub external_project_ids: Vec<String>,
    pub source_lead_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = crm_contacts)]
pub struct CrmContact {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub is_primary: bool,
    pub source_lead_contact_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_pipelines)]
pub struct CrmPipeline {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Insertable)]
#[diesel(table_name = crm_pipeline_stages)]
pub struct CrmPipelineStage {
    pub id: Uuid,
    pub pipeline_id: Uuid,
    pub name: String,
    pub stage_order: i32,
    pub probability: i32,
    pub is_won: bool,
    pub is_lost: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = crm_deals)]
pub struct CrmDeal {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub value: f64,
    pub currency: String,
    pub status: String,
    pub stage_id: Option<Uuid>,
    pub probability: i32,
    pub contact_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub expected_close_date: Option<NaiveDate>,
    pub owner_id: Uuid,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_deal_products)]
pub struct CrmDealProduct {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub discount: f64,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_deal_tech_stack)]
pub struct CrmDealTechStack {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub category: String,
    pub technology_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_activities)]
pub struct CrmActivity {
    pub id: Uuid,
    pub activity_type: String,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub deal_id: Option<Uuid>,
    pub contact_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub referral_partner_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_cadences)]
pub struct CrmCadence {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_cadence_steps)]
pub struct CrmCadenceStep {
    pub id: Uuid,
    pub cadence_id: Uuid,
    pub day_offset: i32,
    pub step_order: i32,
    pub channel: String,
    pub subject: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = crm_lead_cadences)]
pub struct CrmLeadCadence {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub cadence_id: Uuid,
    pub status: String,
    pub started_on: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_lead_cadence_activities)]
pub struct CrmLeadCadenceActivity {
    pub id: Uuid,
    pub lead_cadence_id: Uuid,
    pub cadence_step_id: Uuid,
    pub activity_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_organization_industry_codes)]
pub struct CrmOrganizationIndustryCode {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub industry_code_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_organization_tech_profiles)]
pub struct CrmOrganizationTechProfile {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub category: String,
    pub technology_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_organization_product_interests)]
pub struct CrmOrganizationProductInterest {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = crm_referral_partners)]
pub struct CrmReferralPartner {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_cadence_allows_pause_and_resume() {
        assert!(LeadCadenceStatus::Active.can_transition_to(LeadCadenceStatus::Paused));
        assert!(LeadCadenceStatus::Paused.can_transition_to(LeadCadenceStatus::Active));
    }

    #[test]
    fn lead_cadence_terminal_states_accept_nothing() {
        for terminal in [LeadCadenceStatus::Cancelled, LeadCadenceStatus::Completed] {
            for next in [
                LeadCadenceStatus::Active,
                LeadCadenceStatus::Paused,
                LeadCadenceStatus::Cancelled,
                LeadCadenceStatus::Completed,
            ] {
                assert!(!terminal.can_transition_to(next), "{terminal:?} -> {next:?}");
            }
            assert!(terminal.is_terminal());
        }
    }

    #[test]
    fn lead_cadence_can_cancel_or_complete_from_either_live_state() {
        for live in [LeadCadenceStatus::Active, LeadCadenceStatus::Paused] {
            assert!(live.can_transition_to(LeadCadenceStatus::Cancelled));
            assert!(live.can_transition_to(LeadCadenceStatus::Completed));
        }
    }

    #[test]
    fn lead_cadence_no_self_transitions() {
        assert!(!LeadCadenceStatus::Active.can_transition_to(LeadCadenceStatus::Active));
        assert!(!LeadCadenceStatus::Paused.can_transition_to(LeadCadenceStatus::Paused));
    }

    #[test]
    fn status_strings_round_trip() {
        for s in [
            LeadStatus::New,
            LeadStatus::Qualified,
            LeadStatus::Converted,
            LeadStatus::Disqualified,
        ] {
            assert_eq!(LeadStatus::parse(s.as_str()), Some(s));
        }
        for s in [DealStatus::Open, DealStatus::Won, DealStatus::Lost] {
            assert_eq!(DealStatus::parse(s.as_str()), Some(s));
        }
        for s in [
            LeadCadenceStatus::Active,
            LeadCadenceStatus::Paused,
            LeadCadenceStatus::Cancelled,
            LeadCadenceStatus::Completed,
        ] {
            assert_eq!(LeadCadenceStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(LeadStatus::parse("unknown"), None);
    }

    #[test]
    fn deal_status_closed_check() {
        assert!(!DealStatus::Open.is_closed());
        assert!(DealStatus::Won.is_closed());
        assert!(DealStatus::Lost.is_closed());
    }
}
