use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crm::error::CrmError;
use crate::crm::mapper::{self, OrganizationFields};
use crate::shared::models::{
    CrmLead, CrmLeadContact, CrmOrganizationIndustryCode, CrmOrganizationProductInterest,
    CrmOrganizationTechProfile, LeadStatus,
};
use crate::shared::schema::{
    crm_contacts, crm_lead_contacts, crm_leads, crm_organization_industry_codes,
    crm_organization_product_interests, crm_organization_tech_profiles, crm_organizations,
};

/// Pre-validated conversion input. Contact ids select which lead contacts
/// become contacts; the reference-data sets may all be empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertLeadRequest {
    #[serde(default)]
    pub organization: OrganizationFields,
    #[serde(default)]
    pub contact_ids: Vec<Uuid>,
    #[serde(default)]
    pub industry_code_ids: Vec<Uuid>,
    #[serde(default)]
    pub tech_profiles: BTreeMap<String, Vec<Uuid>>,
    #[serde(default)]
    pub product_interest_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadConversionResult {
    pub organization_id: Uuid,
    pub contact_ids: Vec<Uuid>,
}

/// Convert a lead into an organization. One transaction end to end: the
/// organization, its contacts, the reference-data links and the lead's
/// status flip either all commit or none do.
pub fn convert_lead(
    conn: &mut PgConnection,
    owner_id: Uuid,
    lead_id: Uuid,
    req: &ConvertLeadRequest,
    now: DateTime<Utc>,
) -> Result<LeadConversionResult, CrmError> {
    conn.transaction(|conn| {
        let lead: CrmLead = crm_leads::table
            .filter(crm_leads::id.eq(lead_id))
            .filter(crm_leads::owner_id.eq(owner_id))
            .first(conn)
            .optional()?
            .ok_or(CrmError::NotFound("crm.lead-not-found"))?;

        if LeadStatus::parse(&lead.status) == Some(LeadStatus::Converted) {
            return Err(CrmError::Conflict("crm.lead-already-converted"));
        }

        let organization =
            mapper::organization_from_lead(&lead, &req.organization, Uuid::new_v4(), owner_id, now);
        diesel::insert_into(crm_organizations::table)
            .values(&organization)
            .execute(conn)?;

        let mut contact_ids = Vec::with_capacity(req.contact_ids.len());
        for lead_contact_id in &req.contact_ids {
            let lead_contact: CrmLeadContact = crm_lead_contacts::table
                .filter(crm_lead_contacts::id.eq(lead_contact_id))
                .filter(crm_lead_contacts::lead_id.eq(lead.id))
                .first(conn)
                .optional()?
                .ok_or(CrmError::NotFound("crm.lead-contact-not-found"))?;

            let contact = mapper::contact_from_lead_contact(
                &lead_contact,
                Uuid::new_v4(),
                organization.id,
                owner_id,
                now,
            );
            diesel::insert_into(crm_contacts::table)
                .values(&contact)
                .execute(conn)?;

            // Both sides of the conversion pointer agree or the scope aborts.
            diesel::update(
                crm_lead_contacts::table.filter(crm_lead_contacts::id.eq(lead_contact.id)),
            )
            .set((
                crm_lead_contacts::converted_contact_id.eq(Some(contact.id)),
                crm_lead_contacts::updated_at.eq(now),
            ))
            .execute(conn)?;

            contact_ids.push(contact.id);
        }

        if !req.industry_code_ids.is_empty() {
            let rows: Vec<CrmOrganizationIndustryCode> = req
                .industry_code_ids
                .iter()
                .map(|code_id| CrmOrganizationIndustryCode {
                    id: Uuid::new_v4(),
                    organization_id: organization.id,
                    industry_code_id: *code_id,
                    created_at: now,
                })
                .collect();
            diesel::insert_into(crm_organization_industry_codes::table)
                .values(&rows)
                .execute(conn)?;
        }

        for (category, technology_ids) in &req.tech_profiles {
            if technology_ids.is_empty() {
                continue;
            }
            let rows: Vec<CrmOrganizationTechProfile> = technology_ids
                .iter()
                .map(|technology_id| CrmOrganizationTechProfile {
                    id: Uuid::new_v4(),
                    organization_id: organization.id,
                    category: category.clone(),
                    technology_id: *technology_id,
                    created_at: now,
                })
                .collect();
            diesel::insert_into(crm_organization_tech_profiles::table)
                .values(&rows)
                .execute(conn)?;
        }

        if !req.product_interest_ids.is_empty() {
            let rows: Vec<CrmOrganizationProductInterest> = req
                .product_interest_ids
                .iter()
                .map(|product_id| CrmOrganizationProductInterest {
                    id: Uuid::new_v4(),
                    organization_id: organization.id,
                    product_id: *product_id,
                    created_at: now,
                })
                .collect();
            diesel::insert_into(crm_organization_product_interests::table)
                .values(&rows)
                .execute(conn)?;
        }

        diesel::update(crm_leads::table.filter(crm_leads::id.eq(lead.id)))
            .set((
                crm_leads::status.eq(LeadStatus::Converted.as_str()),
                crm_leads::converted_organization_id.eq(Some(organization.id)),
                crm_leads::updated_at.eq(now),
            ))
            .execute(conn)?;

        log::info!(
            "converted lead {} into organization {} with {} contact(s)",
            lead.id,
            organization.id,
            contact_ids.len()
        );

        Ok(LeadConversionResult {
            organization_id: organization.id,
            contact_ids,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_means_no_contacts_and_no_reference_data() {
        let req: ConvertLeadRequest = serde_json::from_str("{}").expect("deserialize");
        assert!(req.contact_ids.is_empty());
        assert!(req.industry_code_ids.is_empty());
        assert!(req.tech_profiles.is_empty());
        assert!(req.product_interest_ids.is_empty());
        assert!(req.organization.name.is_none());
    }

    #[test]
    fn tech_profiles_group_by_category() {
        let req: ConvertLeadRequest = serde_json::from_str(
            r#"{
                "tech_profiles": {
                    "crm": ["7f2c1f5e-0d1e-4f7a-9d55-0f6f4a5f9d01"],
                    "analytics": []
                }
            }"#,
        )
        .expect("deserialize");
        assert_eq!(req.tech_profiles.len(), 2);
        assert_eq!(req.tech_profiles["crm"].len(), 1);
        assert!(req.tech_profiles["analytics"].is_empty());
    }
}
