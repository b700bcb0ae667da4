//! Employee model and related types.
//!
//! This module defines the Employee struct and EmploymentType enum as read
//! from the personnel directory. The engine only ever reads a snapshot of
//! these records.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the type of employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Career firefighter with a contractual weekly schedule.
    FullTime,
    /// On-call firefighter who declares availability.
    PartTime,
}

/// Represents a firefighter who can be placed on the duty roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The type of employment arrangement.
    pub employment_type: EmploymentType,
    /// Hire date; earlier dates win ties.
    pub seniority_date: NaiveDate,
    /// Configured weekly hour ceiling.
    pub weekly_hour_cap: Decimal,
    /// Competencies held (e.g., "pump_operator", "ems").
    #[serde(default)]
    pub competencies: BTreeSet<String>,
    /// Whether the employee holds an officer rank.
    #[serde(default)]
    pub is_officer: bool,
}

impl Employee {
    /// Returns true if the employee is a part-time (on-call) firefighter.
    ///
    /// # Examples
    ///
    /// ```
    /// use shift_attribution::models::{Employee, EmploymentType};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     employment_type: EmploymentType::PartTime,
    ///     seniority_date: NaiveDate::from_ymd_opt(2019, 4, 1).unwrap(),
    ///     weekly_hour_cap: Decimal::new(24, 0),
    ///     competencies: Default::default(),
    ///     is_officer: false,
    /// };
    /// assert!(employee.is_part_time());
    /// ```
    pub fn is_part_time(&self) -> bool {
        self.employment_type == EmploymentType::PartTime
    }

    /// Returns true if the employee is a full-time firefighter.
    pub fn is_full_time(&self) -> bool {
        self.employment_type == EmploymentType::FullTime
    }

    /// Returns true if the employee holds the given competency.
    pub fn has_competency(&self, competency: &str) -> bool {
        self.competencies.contains(competency)
    }
}
