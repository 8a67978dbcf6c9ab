use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::crm::error::CrmError;
use crate::shared::models::{
    CadenceStatus, CrmActivity, CrmCadence, CrmCadenceStep, CrmLeadCadence,
    CrmLeadCadenceActivity, LeadCadenceStatus,
};
use crate::shared::schema::{
    crm_activities, crm_cadence_steps, crm_cadences, crm_lead_cadence_activities,
    crm_lead_cadences, crm_leads,
};

/// Order steps by (day offset, step order) and anchor them to a start date:
/// day 1 lands on the start date itself.
pub fn schedule_steps<'a>(
    steps: &'a [CrmCadenceStep],
    start: DateTime<Utc>,
) -> Vec<(&'a CrmCadenceStep, DateTime<Utc>)> {
    let mut ordered: Vec<&CrmCadenceStep> = steps.iter().collect();
    ordered.sort_by_key(|s| (s.day_offset, s.step_order));
    ordered
        .into_iter()
        .map(|s| (s, start + Duration::days(i64::from(s.day_offset) - 1)))
        .collect()
}

/// Whole paused days, rounded up, so a resumed sequence never surfaces
/// tasks already overdue. Clock-free: both instants are injected.
pub fn elapsed_paused_days(now: DateTime<Utc>, paused_at: DateTime<Utc>) -> i64 {
    let seconds = (now - paused_at).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + 86_399) / 86_400
}

#[derive(Debug, Clone, Serialize)]
pub struct CadenceApplicationResult {
    pub application: CrmLeadCadence,
    pub activities: Vec<CrmActivity>,
}

fn load_application(
    conn: &mut PgConnection,
    owner_id: Uuid,
    application_id: Uuid,
) -> Result<CrmLeadCadence, CrmError> {
    crm_lead_cadences::table
        .filter(crm_lead_cadences::id.eq(application_id))
        .filter(crm_lead_cadences::owner_id.eq(owner_id))
        .first(conn)
        .optional()?
        .ok_or(CrmError::NotFound("crm.cadence-application-not-found"))
}

fn ensure_transition(
    application: &CrmLeadCadence,
    next: LeadCadenceStatus,
) -> Result<(), CrmError> {
    let current = LeadCadenceStatus::parse(&application.status).ok_or_else(|| {
        CrmError::Internal(format!(
            "cadence application {} has unknown status {:?}",
            application.id, application.status
        ))
    })?;
    if !current.can_transition_to(next) {
        return Err(CrmError::Validation("crm.cadence-transition-invalid"));
    }
    Ok(())
}

/// Expand a cadence template into dated activities for one lead. The
/// application row, every activity and every binding commit together.
pub fn apply_cadence(
    conn: &mut PgConnection,
    owner_id: Uuid,
    lead_id: Uuid,
    cadence_id: Uuid,
    start_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<CadenceApplicationResult, CrmError> {
    conn.transaction(|conn| {
        let lead_exists: i64 = crm_leads::table
            .filter(crm_leads::id.eq(lead_id))
            .filter(crm_leads::owner_id.eq(owner_id))
            .count()
            .get_result(conn)?;
        if lead_exists == 0 {
            return Err(CrmError::NotFound("crm.lead-not-found"));
        }

        let cadence: CrmCadence = crm_cadences::table
            .filter(crm_cadences::id.eq(cadence_id))
            .filter(crm_cadences::owner_id.eq(owner_id))
            .first(conn)
            .optional()?
            .ok_or(CrmError::NotFound("crm.cadence-not-found"))?;

        if CadenceStatus::parse(&cadence.status) != Some(CadenceStatus::Active) {
            return Err(CrmError::Validation("crm.cadence-not-active"));
        }

        let already_applied: i64 = crm_lead_cadences::table
            .filter(crm_lead_cadences::lead_id.eq(lead_id))
            .filter(crm_lead_cadences::cadence_id.eq(cadence_id))
            .count()
            .get_result(conn)?;
        if already_applied > 0 {
            return Err(CrmError::Conflict("crm.cadence-already-applied"));
        }

        let steps: Vec<CrmCadenceStep> = crm_cadence_steps::table
            .filter(crm_cadence_steps::cadence_id.eq(cadence.id))
            .load(conn)?;
        if steps.is_empty() {
            return Err(CrmError::Validation("crm.cadence-has-no-steps"));
        }

        let start = start_date.unwrap_or(now);
        let application = CrmLeadCadence {
            id: Uuid::new_v4(),
            lead_id,
            cadence_id: cadence.id,
            status: LeadCadenceStatus::Active.as_str().to_string(),
            started_on: start,
            paused_at: None,
            ended_at: None,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        diesel::insert_into(crm_lead_cadences::table)
            .values(&application)
            .execute(conn)?;

        let mut activities = Vec::with_capacity(steps.len());
        for (step, due) in schedule_steps(&steps, start) {
            let activity = CrmActivity {
                id: Uuid::new_v4(),
                activity_type: step.channel.clone(),
                subject: Some(step.subject.clone()),
                description: step.description.clone(),
                due_date: Some(due),
                completed: false,
                completed_at: None,
                deal_id: None,
                contact_id: None,
                lead_id: Some(lead_id),
                organization_id: None,
                referral_partner_id: None,
                owner_id,
                created_at: now,
            };
            diesel::insert_into(crm_activities::table)
                .values(&activity)
                .execute(conn)?;

            let binding = CrmLeadCadenceActivity {
                id: Uuid::new_v4(),
                lead_cadence_id: application.id,
                cadence_step_id: step.id,
                activity_id: activity.id,
                scheduled_date: due,
                created_at: now,
            };
            diesel::insert_into(crm_lead_cadence_activities::table)
                .values(&binding)
                .execute(conn)?;

            activities.push(activity);
        }

        log::info!(
            "applied cadence {} to lead {} with {} activity(ies)",
            cadence.id,
            lead_id,
            activities.len()
        );

        Ok(CadenceApplicationResult {
            application,
            activities,
        })
    })
}

/// Freeze an active application.
pub fn pause_cadence(
    conn: &mut PgConnection,
    owner_id: Uuid,
    application_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CrmLeadCadence, CrmError> {
    conn.transaction(|conn| {
        let application = load_application(conn, owner_id, application_id)?;
        ensure_transition(&application, LeadCadenceStatus::Paused)?;

        diesel::update(crm_lead_cadences::table.filter(crm_lead_cadences::id.eq(application.id)))
            .set((
                crm_lead_cadences::status.eq(LeadCadenceStatus::Paused.as_str()),
                crm_lead_cadences::paused_at.eq(Some(now)),
                crm_lead_cadences::updated_at.eq(now),
            ))
            .execute(conn)?;

        Ok(crm_lead_cadences::table
            .filter(crm_lead_cadences::id.eq(application.id))
            .first(conn)?)
    })
}

/// Unfreeze a paused application, pushing every incomplete child activity
/// forward by the whole days spent paused. Activities without a due date
/// stay unset; completed ones keep their history.
pub fn resume_cadence(
    conn: &mut PgConnection,
    owner_id: Uuid,
    application_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CrmLeadCadence, CrmError> {
    conn.transaction(|conn| {
        let application = load_application(conn, owner_id, application_id)?;
        ensure_transition(&application, LeadCadenceStatus::Active)?;

        let paused_at = application.paused_at.ok_or_else(|| {
            CrmError::Internal(format!(
                "paused cadence application {} has no pause timestamp",
                application.id
            ))
        })?;

        let days = elapsed_paused_days(now, paused_at);
        if days > 0 {
            let bindings: Vec<CrmLeadCadenceActivity> = crm_lead_cadence_activities::table
                .filter(crm_lead_cadence_activities::lead_cadence_id.eq(application.id))
                .load(conn)?;

            for binding in bindings {
                let activity: CrmActivity = crm_activities::table
                    .filter(crm_activities::id.eq(binding.activity_id))
                    .first(conn)?;
                if activity.completed {
                    continue;
                }
                let Some(due) = activity.due_date else {
                    continue;
                };
                let shifted = due + Duration::days(days);

                diesel::update(
                    crm_activities::table.filter(crm_activities::id.eq(activity.id)),
                )
                .set(crm_activities::due_date.eq(Some(shifted)))
                .execute(conn)?;

                diesel::update(
                    crm_lead_cadence_activities::table
                        .filter(crm_lead_cadence_activities::id.eq(binding.id)),
                )
                .set(crm_lead_cadence_activities::scheduled_date.eq(shifted))
                .execute(conn)?;
            }
        }

        diesel::update(crm_lead_cadences::table.filter(crm_lead_cadences::id.eq(application.id)))
            .set((
                crm_lead_cadences::status.eq(LeadCadenceStatus::Active.as_str()),
                crm_lead_cadences::paused_at.eq(None::<DateTime<Utc>>),
                crm_lead_cadences::updated_at.eq(now),
            ))
            .execute(conn)?;

        log::info!(
            "resumed cadence application {} after {days} paused day(s)",
            application.id
        );

        Ok(crm_lead_cadences::table
            .filter(crm_lead_cadences::id.eq(application.id))
            .first(conn)?)
    })
}

fn finish_cadence(
    conn: &mut PgConnection,
    owner_id: Uuid,
    application_id: Uuid,
    now: DateTime<Utc>,
    target: LeadCadenceStatus,
) -> Result<CrmLeadCadence, CrmError> {
    conn.transaction(|conn| {
        let application = load_application(conn, owner_id, application_id)?;
        ensure_transition(&application, target)?;

        diesel::update(crm_lead_cadences::table.filter(crm_lead_cadences::id.eq(application.id)))
            .set((
                crm_lead_cadences::status.eq(target.as_str()),
                crm_lead_cadences::ended_at.eq(Some(now)),
                crm_lead_cadences::updated_at.eq(now),
            ))
            .execute(conn)?;

        Ok(crm_lead_cadences::table
            .filter(crm_lead_cadences::id.eq(application.id))
            .first(conn)?)
    })
}

/// Terminal stop; child activities stay behind as history.
pub fn cancel_cadence(
    conn: &mut PgConnection,
    owner_id: Uuid,
    application_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CrmLeadCadence, CrmError> {
    finish_cadence(conn, owner_id, application_id, now, LeadCadenceStatus::Cancelled)
}

pub fn complete_cadence(
    conn: &mut PgConnection,
    owner_id: Uuid,
    application_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CrmLeadCadence, CrmError> {
    finish_cadence(conn, owner_id, application_id, now, LeadCadenceStatus::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::test_fixtures;
    use chrono::TimeZone;

    #[test]
    fn schedule_anchors_day_one_to_the_start_date() {
        let cadence_id = Uuid::new_v4();
        let steps = vec![
            test_fixtures::cadence_step(cadence_id, 7, 1),
            test_fixtures::cadence_step(cadence_id, 1, 1),
            test_fixtures::cadence_step(cadence_id, 3, 1),
        ];
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();

        let schedule = schedule_steps(&steps, start);
        let due: Vec<_> = schedule.iter().map(|(_, d)| *d).collect();
        assert_eq!(
            due,
            vec![
                start,
                start + Duration::days(2),
                start + Duration::days(6),
            ]
        );
    }

    #[test]
    fn schedule_breaks_same_day_ties_by_step_order() {
        let cadence_id = Uuid::new_v4();
        let mut second = test_fixtures::cadence_step(cadence_id, 1, 2);
        second.channel = "call".to_string();
        let first = test_fixtures::cadence_step(cadence_id, 1, 1);
        let steps = vec![second.clone(), first.clone()];

        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let schedule = schedule_steps(&steps, start);
        assert_eq!(schedule[0].0.id, first.id);
        assert_eq!(schedule[1].0.id, second.id);
        assert_eq!(schedule[0].1, schedule[1].1);
    }

    #[test]
    fn paused_days_round_up() {
        let paused_at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        assert_eq!(elapsed_paused_days(paused_at, paused_at), 0);
        assert_eq!(
            elapsed_paused_days(paused_at + Duration::seconds(1), paused_at),
            1
        );
        assert_eq!(
            elapsed_paused_days(paused_at + Duration::days(5), paused_at),
            5
        );
        assert_eq!(
            elapsed_paused_days(
                paused_at + Duration::days(4) + Duration::hours(1),
                paused_at
            ),
            5
        );
    }

    #[test]
    fn paused_days_never_negative() {
        let paused_at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        assert_eq!(
            elapsed_paused_days(paused_at - Duration::hours(2), paused_at),
            0
        );
    }
}
