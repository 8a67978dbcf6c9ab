use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::crm::error::CrmError;
use crate::shared::schema::{
    crm_activities, crm_contacts, crm_deal_products, crm_deal_tech_stack, crm_deals,
    crm_organization_industry_codes, crm_organization_product_interests,
    crm_organization_tech_profiles, crm_organizations,
};

/// The store has no native cascade, so deletion follows an explicit plan,
/// leaves first: children must be gone before their parent row is removed.
/// The order of these arrays is the invariant; the executors walk them
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealCascadeStep {
    Products,
    TechStackLinks,
    Activities,
    DealRow,
}

pub const DEAL_DELETION_PLAN: [DealCascadeStep; 4] = [
    DealCascadeStep::Products,
    DealCascadeStep::TechStackLinks,
    DealCascadeStep::Activities,
    DealCascadeStep::DealRow,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizationCascadeStep {
    Contacts,
    Deals,
    Activities,
    TechProfileLinks,
    ProductInterestLinks,
    IndustryCodeLinks,
    OrganizationRow,
}

pub const ORGANIZATION_DELETION_PLAN: [OrganizationCascadeStep; 7] = [
    OrganizationCascadeStep::Contacts,
    OrganizationCascadeStep::Deals,
    OrganizationCascadeStep::Activities,
    OrganizationCascadeStep::TechProfileLinks,
    OrganizationCascadeStep::ProductInterestLinks,
    OrganizationCascadeStep::IndustryCodeLinks,
    OrganizationCascadeStep::OrganizationRow,
];

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DealCascadeOutcome {
    pub products: usize,
    pub tech_stack_links: usize,
    pub activities: usize,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct OrganizationCascadeOutcome {
    pub contacts: usize,
    pub deals: usize,
    pub deal_products: usize,
    pub deal_tech_stack_links: usize,
    pub activities: usize,
    pub tech_profile_links: usize,
    pub product_interest_links: usize,
    pub industry_code_links: usize,
    pub success: bool,
}

fn run_deal_step(
    conn: &mut PgConnection,
    deal_id: Uuid,
    step: DealCascadeStep,
) -> QueryResult<usize> {
    match step {
        DealCascadeStep::Products => {
            diesel::delete(crm_deal_products::table.filter(crm_deal_products::deal_id.eq(deal_id)))
                .execute(conn)
        }
        DealCascadeStep::TechStackLinks => diesel::delete(
            crm_deal_tech_stack::table.filter(crm_deal_tech_stack::deal_id.eq(deal_id)),
        )
        .execute(conn),
        DealCascadeStep::Activities => {
            diesel::delete(crm_activities::table.filter(crm_activities::deal_id.eq(deal_id)))
                .execute(conn)
        }
        DealCascadeStep::DealRow => {
            diesel::delete(crm_deals::table.filter(crm_deals::id.eq(deal_id))).execute(conn)
        }
    }
}

/// Deal sub-tree deletion shared by both cascade roots. Returns the counts
/// for everything below the deal row.
fn delete_deal_subtree(conn: &mut PgConnection, deal_id: Uuid) -> QueryResult<DealCascadeOutcome> {
    let mut outcome = DealCascadeOutcome::default();
    for step in DEAL_DELETION_PLAN {
        let deleted = run_deal_step(conn, deal_id, step)?;
        match step {
            DealCascadeStep::Products => outcome.products = deleted,
            DealCascadeStep::TechStackLinks => outcome.tech_stack_links = deleted,
            DealCascadeStep::Activities => outcome.activities = deleted,
            DealCascadeStep::DealRow => {}
        }
    }
    Ok(outcome)
}

/// Delete a deal and everything that depends on it. Ownership is verified
/// inside the scope; an absent or foreign deal is NotFound either way.
pub fn delete_deal_cascade(
    conn: &mut PgConnection,
    owner_id: Uuid,
    deal_id: Uuid,
) -> Result<DealCascadeOutcome, CrmError> {
    conn.transaction(|conn| {
        let owned: i64 = crm_deals::table
            .filter(crm_deals::id.eq(deal_id))
            .filter(crm_deals::owner_id.eq(owner_id))
            .count()
            .get_result(conn)?;
        if owned == 0 {
            return Err(CrmError::NotFound("crm.deal-not-found"));
        }

        let mut outcome = delete_deal_subtree(conn, deal_id)?;
        outcome.success = true;

        log::info!(
            "cascade-deleted deal {deal_id}: {} product(s), {} tech link(s), {} activity(ies)",
            outcome.products,
            outcome.tech_stack_links,
            outcome.activities
        );
        Ok(outcome)
    })
}

fn run_organization_step(
    conn: &mut PgConnection,
    organization_id: Uuid,
    step: OrganizationCascadeStep,
    outcome: &mut OrganizationCascadeOutcome,
) -> QueryResult<()> {
    match step {
        OrganizationCascadeStep::Contacts => {
            outcome.contacts = diesel::delete(
                crm_contacts::table.filter(crm_contacts::organization_id.eq(organization_id)),
            )
            .execute(conn)?;
        }
        OrganizationCascadeStep::Deals => {
            let deal_ids: Vec<Uuid> = crm_deals::table
                .filter(crm_deals::organization_id.eq(organization_id))
                .select(crm_deals::id)
                .load(conn)?;
            for deal_id in deal_ids {
                let deal_outcome = delete_deal_subtree(conn, deal_id)?;
                outcome.deals += 1;
                outcome.deal_products += deal_outcome.products;
                outcome.deal_tech_stack_links += deal_outcome.tech_stack_links;
                outcome.activities += deal_outcome.activities;
            }
        }
        OrganizationCascadeStep::Activities => {
            outcome.activities += diesel::delete(
                crm_activities::table.filter(crm_activities::organization_id.eq(organization_id)),
            )
            .execute(conn)?;
        }
        OrganizationCascadeStep::TechProfileLinks => {
            outcome.tech_profile_links = diesel::delete(
                crm_organization_tech_profiles::table
                    .filter(crm_organization_tech_profiles::organization_id.eq(organization_id)),
            )
            .execute(conn)?;
        }
        OrganizationCascadeStep::ProductInterestLinks => {
            outcome.product_interest_links = diesel::delete(
                crm_organization_product_interests::table.filter(
                    crm_organization_product_interests::organization_id.eq(organization_id),
                ),
            )
            .execute(conn)?;
        }
        OrganizationCascadeStep::IndustryCodeLinks => {
            outcome.industry_code_links = diesel::delete(
                crm_organization_industry_codes::table
                    .filter(crm_organization_industry_codes::organization_id.eq(organization_id)),
            )
            .execute(conn)?;
        }
        OrganizationCascadeStep::OrganizationRow => {
            diesel::delete(
                crm_organizations::table.filter(crm_organizations::id.eq(organization_id)),
            )
            .execute(conn)?;
        }
    }
    Ok(())
}

/// Delete an organization with its contacts, every deal rooted under it
/// (each through the deal plan), its direct activities and its
/// reference-data links. Referral partners and the opaque external project
/// ids are preserved, never part of any plan.
pub fn delete_organization_cascade(
    conn: &mut PgConnection,
    owner_id: Uuid,
    organization_id: Uuid,
) -> Result<OrganizationCascadeOutcome, CrmError> {
    conn.transaction(|conn| {
        let owned: i64 = crm_organizations::table
            .filter(crm_organizations::id.eq(organization_id))
            .filter(crm_organizations::owner_id.eq(owner_id))
            .count()
            .get_result(conn)?;
        if owned == 0 {
            return Err(CrmError::NotFound("crm.organization-not-found"));
        }

        let mut outcome = OrganizationCascadeOutcome::default();
        for step in ORGANIZATION_DELETION_PLAN {
            run_organization_step(conn, organization_id, step, &mut outcome)?;
        }
        outcome.success = true;

        log::info!(
            "cascade-deleted organization {organization_id}: {} deal(s), {} contact(s), {} activity(ies)",
            outcome.deals,
            outcome.contacts,
            outcome.activities
        );
        Ok(outcome)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_of<T: PartialEq>(plan: &[T], step: T) -> usize {
        plan.iter().position(|s| *s == step).expect("step in plan")
    }

    #[test]
    fn deal_plan_deletes_children_before_the_deal_row() {
        let deal_row = position_of(&DEAL_DELETION_PLAN, DealCascadeStep::DealRow);
        assert_eq!(deal_row, DEAL_DELETION_PLAN.len() - 1);
        assert!(position_of(&DEAL_DELETION_PLAN, DealCascadeStep::Products) < deal_row);
        assert!(position_of(&DEAL_DELETION_PLAN, DealCascadeStep::TechStackLinks) < deal_row);
        assert!(position_of(&DEAL_DELETION_PLAN, DealCascadeStep::Activities) < deal_row);
    }

    #[test]
    fn organization_plan_deletes_deals_before_links_and_row_last() {
        let org_row = position_of(
            &ORGANIZATION_DELETION_PLAN,
            OrganizationCascadeStep::OrganizationRow,
        );
        assert_eq!(org_row, ORGANIZATION_DELETION_PLAN.len() - 1);

        let deals = position_of(&ORGANIZATION_DELETION_PLAN, OrganizationCascadeStep::Deals);
        let contacts = position_of(
            &ORGANIZATION_DELETION_PLAN,
            OrganizationCascadeStep::Contacts,
        );
        assert!(contacts < deals);
        assert!(deals < org_row);

        for link_step in [
            OrganizationCascadeStep::TechProfileLinks,
            OrganizationCascadeStep::ProductInterestLinks,
            OrganizationCascadeStep::IndustryCodeLinks,
        ] {
            assert!(position_of(&ORGANIZATION_DELETION_PLAN, link_step) < org_row);
        }
    }

    #[test]
    fn plans_have_no_duplicate_steps() {
        for (i, a) in DEAL_DELETION_PLAN.iter().enumerate() {
            for b in &DEAL_DELETION_PLAN[i + 1..] {
                assert_ne!(a, b);
            }
        }
        for (i, a) in ORGANIZATION_DELETION_PLAN.iter().enumerate() {
            for b in &ORGANIZATION_DELETION_PLAN[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
