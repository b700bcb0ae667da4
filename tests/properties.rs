//! Property tests for attribution runs.
//!
//! Random rosters (mixed part-time and full-time staff, manual slots,
//! overlapping watches, officer and competency requirements, availability
//! declarations) are run through the engine and the outcome is checked for
//! the guarantees every run must hold.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Days, NaiveDate, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use shift_attribution::attribution::{EquityLedger, RosterSnapshot, RunOutcome, run_attribution};
use shift_attribution::config::AttributionConfig;
use shift_attribution::models::{
    AssignmentSource, AvailabilityDeclaration, AvailabilityState, Employee, EmploymentType,
    Horizon, ShiftSlot, ShiftType, Tier,
};

const WEEK_KEY: &str = "week:2026-W10";

#[derive(Debug, Clone)]
struct EmployeeSpec {
    full_time: bool,
    hired_offset: u64,
    prior_hours: i64,
    officer: bool,
    ems: bool,
}

#[derive(Debug, Clone)]
struct SlotSpec {
    day: u64,
    start_hour: u32,
    duration: i64,
    officer: bool,
    ems: bool,
    manual_occupant: Option<usize>,
    rescue: bool,
}

#[derive(Debug, Clone)]
struct DeclarationSpec {
    employee: usize,
    day: u64,
    available: bool,
}

fn arb_employee() -> impl Strategy<Value = EmployeeSpec> {
    (any::<bool>(), 0u64..4000, 0i64..48, any::<bool>(), any::<bool>()).prop_map(
        |(full_time, hired_offset, prior_hours, officer, ems)| EmployeeSpec {
            full_time,
            hired_offset,
            prior_hours,
            officer,
            ems,
        },
    )
}

fn arb_slot() -> impl Strategy<Value = SlotSpec> {
    (
        0u64..7,
        0u32..24,
        prop_oneof![Just(4i64), Just(8), Just(12), Just(24)],
        prop::bool::weighted(0.2),
        prop::bool::weighted(0.3),
        prop::option::weighted(0.2, 0usize..8),
        any::<bool>(),
    )
        .prop_map(
            |(day, start_hour, duration, officer, ems, manual_occupant, rescue)| SlotSpec {
                day,
                start_hour,
                duration,
                officer,
                ems,
                manual_occupant,
                rescue,
            },
        )
}

fn arb_declarations() -> impl Strategy<Value = Vec<DeclarationSpec>> {
    prop::collection::vec(
        (0usize..8, 0u64..7, prop::bool::weighted(0.7)).prop_map(|(employee, day, available)| {
            DeclarationSpec {
                employee,
                day,
                available,
            }
        }),
        0..16,
    )
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn week() -> Horizon {
    Horizon::new(monday(), NaiveDate::from_ymd_opt(2026, 3, 8).unwrap())
}

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 25, 12, 0, 0).unwrap()
}

fn employee_id(index: usize) -> String {
    format!("emp_{:02}", index)
}

fn build_roster(
    employees: &[EmployeeSpec],
    slots: &[SlotSpec],
    declarations: &[DeclarationSpec],
) -> (RosterSnapshot, EquityLedger) {
    let hire_origin = NaiveDate::from_ymd_opt(2005, 1, 1).unwrap();
    let mut ledger = EquityLedger::new();

    let employees: Vec<Employee> = employees
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let id = employee_id(i);
            ledger.credit(&id, WEEK_KEY, Decimal::new(spec.prior_hours, 0));
            Employee {
                id,
                employment_type: if spec.full_time {
                    EmploymentType::FullTime
                } else {
                    EmploymentType::PartTime
                },
                seniority_date: hire_origin + Days::new(spec.hired_offset),
                weekly_hour_cap: Decimal::new(if spec.full_time { 40 } else { 36 }, 0),
                competencies: if spec.ems {
                    ["ems".to_string()].into_iter().collect()
                } else {
                    BTreeSet::new()
                },
                is_officer: spec.officer,
            }
        })
        .collect();

    let count = employees.len();
    let slots: Vec<ShiftSlot> = slots
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let start = (monday() + Days::new(spec.day))
                .and_hms_opt(spec.start_hour, 0, 0)
                .unwrap();
            let manual = spec.manual_occupant.map(|o| employee_id(o % count));
            ShiftSlot {
                id: format!("slot_{:02}", i),
                shift_type_id: if spec.rescue { "rescue" } else { "day" }.to_string(),
                required_competencies: if spec.ems {
                    ["ems".to_string()].into_iter().collect()
                } else {
                    BTreeSet::new()
                },
                officer_required: spec.officer,
                start_time: start,
                end_time: start + TimeDelta::hours(spec.duration),
                source: if manual.is_some() {
                    AssignmentSource::Manual
                } else {
                    AssignmentSource::Unfilled
                },
                occupant: manual,
            }
        })
        .collect();

    let declarations = declarations
        .iter()
        .filter(|d| d.employee < count)
        .map(|d| {
            let start = (monday() + Days::new(d.day)).and_hms_opt(0, 0, 0).unwrap();
            AvailabilityDeclaration {
                employee_id: employee_id(d.employee),
                start_time: start,
                end_time: start + TimeDelta::days(1),
                state: if d.available {
                    AvailabilityState::Available
                } else {
                    AvailabilityState::Unavailable
                },
                declared_at: None,
            }
        })
        .collect();

    let shift_types = vec![
        ShiftType {
            id: "rescue".to_string(),
            name: "Rescue".to_string(),
            priority: 1,
            required_competencies: BTreeSet::new(),
            officer_required: false,
        },
        ShiftType {
            id: "day".to_string(),
            name: "Day watch".to_string(),
            priority: 2,
            required_competencies: BTreeSet::new(),
            officer_required: false,
        },
    ];

    (
        RosterSnapshot {
            employees,
            shift_types,
            slots,
            declarations,
        },
        ledger,
    )
}

fn run(
    employees: &[EmployeeSpec],
    slots: &[SlotSpec],
    declarations: &[DeclarationSpec],
    config: &AttributionConfig,
) -> (RosterSnapshot, RunOutcome) {
    let (snapshot, ledger) = build_roster(employees, slots, declarations);
    let outcome = run_attribution("sdis-42", week(), config, snapshot.clone(), ledger, as_of())
        .expect("valid configuration");
    (snapshot, outcome)
}

fn with_overtime(overtime_enabled: bool) -> AttributionConfig {
    AttributionConfig {
        overtime_enabled,
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn no_employee_is_double_booked(
        employees in prop::collection::vec(arb_employee(), 1..8),
        slots in prop::collection::vec(arb_slot(), 1..14),
        declarations in arb_declarations(),
        overtime in any::<bool>(),
    ) {
        let (_, outcome) = run(&employees, &slots, &declarations, &with_overtime(overtime));
        let new_slots: HashSet<&str> =
            outcome.assignments.iter().map(|a| a.slot_id.as_str()).collect();

        for a in outcome.slots.iter().filter(|s| new_slots.contains(s.id.as_str())) {
            for b in outcome.slots.iter().filter(|s| s.id != a.id && s.occupant == a.occupant) {
                prop_assert!(
                    !a.overlaps(b.start_time, b.end_time),
                    "{} and {} overlap for {:?}", a.id, b.id, a.occupant
                );
            }
        }
    }

    #[test]
    fn manual_slots_are_never_changed(
        employees in prop::collection::vec(arb_employee(), 1..8),
        slots in prop::collection::vec(arb_slot(), 1..14),
        declarations in arb_declarations(),
        overtime in any::<bool>(),
    ) {
        let (snapshot, outcome) = run(&employees, &slots, &declarations, &with_overtime(overtime));

        for before in snapshot.slots.iter().filter(|s| s.is_manual()) {
            let after = outcome.slots.iter().find(|s| s.id == before.id).unwrap();
            prop_assert_eq!(before, after);
            prop_assert!(outcome.summary.filled_slot(&before.id).is_none());
            prop_assert!(outcome.summary.unfilled_slot(&before.id).is_none());
        }
    }

    #[test]
    fn closed_overtime_gate_never_yields_tier_5(
        employees in prop::collection::vec(arb_employee(), 1..8),
        slots in prop::collection::vec(arb_slot(), 1..14),
        declarations in arb_declarations(),
    ) {
        let (_, outcome) = run(&employees, &slots, &declarations, &with_overtime(false));

        prop_assert!(outcome.summary.filled.iter().all(|f| f.tier != Tier::FullTimeOvertime));
        prop_assert!(outcome.summary.decisions.iter().all(|d| d.tier != Tier::FullTimeOvertime));
    }

    #[test]
    fn every_auto_slot_has_exactly_one_decision(
        employees in prop::collection::vec(arb_employee(), 1..8),
        slots in prop::collection::vec(arb_slot(), 1..14),
        declarations in arb_declarations(),
        overtime in any::<bool>(),
    ) {
        let (_, outcome) = run(&employees, &slots, &declarations, &with_overtime(overtime));

        let mut per_slot: HashMap<&str, usize> = HashMap::new();
        for decision in &outcome.summary.decisions {
            *per_slot.entry(decision.slot_id.as_str()).or_default() += 1;
        }

        let auto_slots: Vec<&ShiftSlot> = outcome
            .slots
            .iter()
            .filter(|s| s.source == AssignmentSource::Auto)
            .collect();
        prop_assert_eq!(auto_slots.len(), outcome.summary.decisions.len());
        prop_assert_eq!(outcome.assignments.len(), outcome.summary.decisions.len());
        for slot in auto_slots {
            prop_assert_eq!(per_slot.get(slot.id.as_str()).copied(), Some(1));
            let decision = outcome
                .summary
                .decisions
                .iter()
                .find(|d| d.slot_id == slot.id)
                .unwrap();
            prop_assert_eq!(slot.occupant.as_deref(), Some(decision.employee_id.as_str()));
        }
    }

    #[test]
    fn equity_reads_include_earlier_credits(
        employees in prop::collection::vec(arb_employee(), 1..5),
        slots in prop::collection::vec(arb_slot(), 2..14),
        declarations in arb_declarations(),
    ) {
        let (_, outcome) = run(&employees, &slots, &declarations, &with_overtime(true));

        let mut last: HashMap<&str, (Decimal, Decimal, &str)> = HashMap::new();
        for decision in &outcome.summary.decisions {
            let selected = decision.selected_candidate().unwrap();
            if let Some((read, credited, key)) = last.get(decision.employee_id.as_str()) {
                if *key == decision.period_key {
                    prop_assert!(selected.equity_hours >= *read + *credited);
                }
            }
            last.insert(
                decision.employee_id.as_str(),
                (selected.equity_hours, decision.slot_hours, decision.period_key.as_str()),
            );
        }
    }

    #[test]
    fn declared_available_part_timer_takes_precedence(
        employees in prop::collection::vec(arb_employee(), 1..8),
        officer in prop::bool::weighted(0.3),
        ems in prop::bool::weighted(0.3),
        declarations in prop::collection::vec(
            (0usize..8, prop::bool::weighted(0.7)).prop_map(|(employee, available)| DeclarationSpec {
                employee,
                day: 0,
                available,
            }),
            0..10,
        ),
    ) {
        let slot = SlotSpec {
            day: 0,
            start_hour: 8,
            duration: 12,
            officer,
            ems,
            manual_occupant: None,
            rescue: false,
        };
        let (_, outcome) = run(&employees, &[slot], &declarations, &with_overtime(true));

        let tier2_pool: Vec<String> = employees
            .iter()
            .enumerate()
            .filter(|(i, e)| {
                let declared = |available: bool| {
                    declarations.iter().any(|d| d.employee == *i && d.available == available)
                };
                !e.full_time
                    && (!officer || e.officer)
                    && (!ems || e.ems)
                    && declared(true)
                    && !declared(false)
            })
            .map(|(i, _)| employee_id(i))
            .collect();

        if tier2_pool.is_empty() {
            prop_assert!(outcome.summary.filled.iter().all(|f| f.tier != Tier::PartTimeAvailable));
        } else {
            let filled = &outcome.summary.filled[0];
            prop_assert_eq!(filled.tier, Tier::PartTimeAvailable);
            prop_assert!(tier2_pool.contains(&filled.employee_id));
        }
    }
}
