use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::shared::models::{CrmContact, CrmLead, CrmLeadContact, CrmOrganization};

/// Caller-supplied, pre-validated overrides for the organization created by
/// a conversion. Anything left `None` falls back to the lead's own fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizationFields {
    pub name: Option<String>,
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
}

fn merge(override_value: &Option<String>, lead_value: &Option<String>) -> Option<String> {
    override_value.clone().or_else(|| lead_value.clone())
}

/// Map a lead onto a new organization row. Side-effect free; the transaction
/// around it decides whether anything is persisted.
pub fn organization_from_lead(
    lead: &CrmLead,
    fields: &OrganizationFields,
    organization_id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
) -> CrmOrganization {
    CrmOrganization {
        id: organization_id,
        name: fields
            .name
            .clone()
            .unwrap_or_else(|| lead.company_name.clone()),
        website: merge(&fields.website, &lead.website),
        industry: merge(&fields.industry, &lead.industry),
        employee_band: merge(&fields.employee_band, &lead.employee_band),
        tax_id: merge(&fields.tax_id, &lead.tax_id),
        email: merge(&fields.email, &lead.email),
        phone: merge(&fields.phone, &lead.phone),
        address_line1: merge(&fields.address_line1, &lead.address_line1),
        address_line2: merge(&fields.address_line2, &lead.address_line2),
        city: merge(&fields.city, &lead.city),
        state: merge(&fields.state, &lead.state),
        postal_code: merge(&fields.postal_code, &lead.postal_code),
        country: merge(&fields.country, &lead.country),
        external_project_ids: Vec::new(),
        source_lead_id: Some(lead.id),
        owner_id,
        created_at: now,
        updated_at: now,
    }
}

/// Map a lead contact onto a new contact row bound to the organization the
/// lead became.
pub fn contact_from_lead_contact(
    lead_contact: &CrmLeadContact,
    contact_id: Uuid,
    organization_id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
) -> CrmContact {
    CrmContact {
        id: contact_id,
        organization_id: Some(organization_id),
        first_name: lead_contact.first_name.clone(),
        last_name: lead_contact.last_name.clone(),
        email: lead_contact.email.clone(),
        phone: lead_contact.phone.clone(),
        job_title: lead_contact.job_title.clone(),
        is_primary: lead_contact.is_primary,
        source_lead_contact_id: Some(lead_contact.id),
        owner_id,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::test_fixtures;

    #[test]
    fn lead_fields_carry_over_by_default() {
        let owner = Uuid::new_v4();
        let lead = test_fixtures::lead(owner);
        let org = organization_from_lead(
            &lead,
            &OrganizationFields::default(),
            Uuid::new_v4(),
            owner,
            Utc::now(),
        );
        assert_eq!(org.name, lead.company_name);
        assert_eq!(org.tax_id, lead.tax_id);
        assert_eq!(org.city, lead.city);
        assert_eq!(org.source_lead_id, Some(lead.id));
        assert_eq!(org.owner_id, owner);
        assert!(org.external_project_ids.is_empty());
    }

    #[test]
    fn overrides_win_over_lead_fields() {
        let owner = Uuid::new_v4();
        let lead = test_fixtures::lead(owner);
        let fields = OrganizationFields {
            name: Some("Acme Holdings Inc".to_string()),
            tax_id: Some("98-7654321".to_string()),
            ..OrganizationFields::default()
        };
        let org = organization_from_lead(&lead, &fields, Uuid::new_v4(), owner, Utc::now());
        assert_eq!(org.name, "Acme Holdings Inc");
        assert_eq!(org.tax_id.as_deref(), Some("98-7654321"));
        assert_eq!(org.website, lead.website);
    }

    #[test]
    fn contact_keeps_primary_flag_and_back_reference() {
        let owner = Uuid::new_v4();
        let lead_contact = test_fixtures::lead_contact(Uuid::new_v4(), true);
        let organization_id = Uuid::new_v4();
        let contact = contact_from_lead_contact(
            &lead_contact,
            Uuid::new_v4(),
            organization_id,
            owner,
            Utc::now(),
        );
        assert!(contact.is_primary);
        assert_eq!(contact.organization_id, Some(organization_id));
        assert_eq!(contact.source_lead_contact_id, Some(lead_contact.id));
        assert_eq!(contact.email, lead_contact.email);
    }
}
