diesel::table! {
    crm_leads (id) {
        id -> Uuid,
        company_name -> Varchar,
        website -> Nullable<Varchar>,
        industry -> Nullable<Varchar>,
        employee_band -> Nullable<Varchar>,
        tax_id -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        address_line1 -> Nullable<Varchar>,
        address_line2 -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        state -> Nullable<Varchar>,
        postal_code -> Nullable<Varchar>,
        country -> Nullable<Varchar>,
        source -> Nullable<Varchar>,
        status -> Varchar,
        owner_id -> Uuid,
        converted_organization_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    crm_lead_contacts (id) {
        id -> Uuid,
        lead_id -> Uuid,
        first_name -> Nullable<Varchar>,
        last_name -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        job_title -> Nullable<Varchar>,
        is_primary -> Bool,
        converted_contact_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    crm_organizations (id) {
        id -> Uuid,
        name -> Varchar,
        website -> Nullable<Varchar>,
        industry -> Nullable<Varchar>,
        employee_band -> Nullable<Varchar>,
        tax_id -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        address_line1 -> Nullable<Varchar>,
        address_line2 -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        state -> Nullable<Varchar>,
        postal_code -> Nullable<Varchar>,
        country -> Nullable<Varchar>,
        external_project_ids -> Array<Text>,
        source_lead_id -> Nullable<Uuid>,
        owner_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    crm_contacts (id) {
        id -> Uuid,
        organization_id -> Nullable<Uuid>,
        first_name -> Nullable<Varchar>,
        last_name -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        job_title -> Nullable<Varchar>,
        is_primary -> Bool,
        source_lead_contact_id -> Nullable<Uuid>,
        owner_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    crm_pipelines (id) {
        id -> Uuid,
        name -> Varchar,
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    crm_pipeline_stages (id) {
        id -> Uuid,
        pipeline_id -> Uuid,
        name -> Varchar,
        stage_order -> Int4,
        probability -> Int4,
        is_won -> Bool,
        is_lost -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    crm_deals (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        value -> Float8,
        currency -> Varchar,
        status -> Varchar,
        stage_id -> Nullable<Uuid>,
        probability -> Int4,
        contact_id -> Nullable<Uuid>,
        organization_id -> Nullable<Uuid>,
        expected_close_date -> Nullable<Date>,
        owner_id -> Uuid,
        closed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    crm_deal_products (id) {
        id -> Uuid,
        deal_id -> Uuid,
        name -> Varchar,
        quantity -> Int4,
        unit_price -> Float8,
        discount -> Float8,
        position -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    crm_deal_tech_stack (id) {
        id -> Uuid,
        deal_id -> Uuid,
        category -> Varchar,
        technology_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    crm_activities (id) {
        id -> Uuid,
        activity_type -> Varchar,
        subject -> Nullable<Varchar>,
        description -> Nullable<Text>,
        due_date -> Nullable<Timestamptz>,
        completed -> Bool,
        completed_at -> Nullable<Timestamptz>,
        deal_id -> Nullable<Uuid>,
        contact_id -> Nullable<Uuid>,
        lead_id -> Nullable<Uuid>,
        organization_id -> Nullable<Uuid>,
        referral_partner_id -> Nullable<Uuid>,
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    crm_cadences (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        status -> Varchar,
        owner_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    crm_cadence_steps (id) {
        id -> Uuid,
        cadence_id -> Uuid,
        day_offset -> Int4,
        step_order -> Int4,
        channel -> Varchar,
        subject -> Varchar,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    crm_lead_cadences (id) {
        id -> Uuid,
        lead_id -> Uuid,
        cadence_id -> Uuid,
        status -> Varchar,
        started_on -> Timestamptz,
        paused_at -> Nullable<Timestamptz>,
        ended_at -> Nullable<Timestamptz>,
        owner_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    crm_lead_cadence_activities (id) {
        id -> Uuid,
        lead_cadence_id -> Uuid,
        cadence_step_id -> Uuid,
        activity_id -> Uuid,
        scheduled_date -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    crm_organization_industry_codes (id) {
        id -> Uuid,
        organization_id -> Uuid,
        industry_code_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    crm_organization_tech_profiles (id) {
        id -> Uuid,
        organization_id -> Uuid,
        category -> Varchar,
        technology_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    crm_organization_product_interests (id) {
        id -> Uuid,
        organization_id -> Uuid,
        product_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    crm_referral_partners (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Nullable<Varchar>,
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(crm_lead_contacts -> crm_leads (lead_id));
diesel::joinable!(crm_contacts -> crm_organizations (organization_id));
diesel::joinable!(crm_pipeline_stages -> crm_pipelines (pipeline_id));
diesel::joinable!(crm_deals -> crm_pipeline_stages (stage_id));
diesel::joinable!(crm_deals -> crm_organizations (organization_id));
diesel::joinable!(crm_deal_products -> crm_deals (deal_id));
diesel::joinable!(crm_deal_tech_stack -> crm_deals (deal_id));
diesel::joinable!(crm_cadence_steps -> crm_cadences (cadence_id));
diesel::joinable!(crm_lead_cadences -> crm_leads (lead_id));
diesel::joinable!(crm_lead_cadences -> crm_cadences (cadence_id));
diesel::joinable!(crm_lead_cadence_activities -> crm_lead_cadences (lead_cadence_id));
diesel::joinable!(crm_lead_cadence_activities -> crm_cadence_steps (cadence_step_id));
diesel::joinable!(crm_lead_cadence_activities -> crm_activities (activity_id));
diesel::joinable!(crm_organization_industry_codes -> crm_organizations (organization_id));
diesel::joinable!(crm_organization_tech_profiles -> crm_organizations (organization_id));
diesel::joinable!(crm_organization_product_interests -> crm_organizations (organization_id));

diesel::allow_tables_to_appear_in_same_query!(
    crm_leads,
    crm_lead_contacts,
    crm_organizations,
    crm_contacts,
    crm_pipelines,
    crm_pipeline_stages,
    crm_deals,
    crm_deal_products,
    crm_deal_tech_stack,
    crm_activities,
    crm_cadences,
    crm_cadence_steps,
    crm_lead_cadences,
    crm_lead_cadence_activities,
    crm_organization_industry_codes,
    crm_organization_tech_profiles,
    crm_organization_product_interests,
    crm_referral_partners,
);
