//! Admission applications submitted from the public form

use super::{reconcile, required};
use crate::error::{AppError, Result};
use crate::storage::resource::{newest_first, Column, FailureMessages, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT")]
pub enum AdmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl AdmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionStatus::Pending => "Pending",
            AdmissionStatus::Approved => "Approved",
            AdmissionStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    pub id: i64,
    pub full_name: String,
    pub date_of_birth: String,
    pub gender: String,
    #[serde(default)]
    pub nationality: Option<String>,
    pub parent_name: String,
    pub contact_number: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    pub course: String,
    #[serde(default)]
    pub previous_school: Option<String>,
    #[serde(default)]
    pub grade_percentage: Option<String>,
    pub status: AdmissionStatus,
    pub created_at: DateTime<Utc>,
}

/// Application form payload, after field-name reconciliation.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "AdmissionForm")]
pub struct NewAdmission {
    pub full_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub nationality: Option<String>,
    pub parent_name: String,
    pub contact_number: String,
    pub email: Option<String>,
    pub address: String,
    pub course: String,
    pub previous_school: Option<String>,
    pub grade_percentage: Option<String>,
}

/// Application form as submitted.
///
/// Earlier revisions of the public form and the legacy `admissions.json`
/// document use `dob`, `guardianName`, `contact`, `program` and
/// `previousEducation`. When a payload carries both names the current one
/// wins.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdmissionForm {
    full_name: String,
    #[serde(default)]
    date_of_birth: Option<String>,
    #[serde(default)]
    dob: Option<String>,
    gender: String,
    #[serde(default)]
    nationality: Option<String>,
    #[serde(default)]
    parent_name: Option<String>,
    #[serde(default)]
    guardian_name: Option<String>,
    #[serde(default)]
    contact_number: Option<String>,
    #[serde(default)]
    contact: Option<String>,
    #[serde(default)]
    email: Option<String>,
    address: String,
    #[serde(default)]
    course: Option<String>,
    #[serde(default)]
    program: Option<String>,
    #[serde(default)]
    previous_school: Option<String>,
    #[serde(default)]
    previous_education: Option<String>,
    #[serde(default)]
    grade_percentage: Option<String>,
}

impl TryFrom<AdmissionForm> for NewAdmission {
    type Error = String;

    fn try_from(form: AdmissionForm) -> std::result::Result<Self, String> {
        Ok(NewAdmission {
            full_name: form.full_name,
            date_of_birth: required(reconcile(form.date_of_birth, form.dob), "dateOfBirth")?,
            gender: form.gender,
            nationality: form.nationality,
            parent_name: required(reconcile(form.parent_name, form.guardian_name), "parentName")?,
            contact_number: required(
                reconcile(form.contact_number, form.contact),
                "contactNumber",
            )?,
            email: form.email,
            address: form.address,
            course: required(reconcile(form.course, form.program), "course")?,
            previous_school: reconcile(form.previous_school, form.previous_education),
            grade_percentage: form.grade_percentage,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdmissionPatch {
    #[serde(default)]
    pub status: Option<AdmissionStatus>,
}

impl Resource for Admission {
    type New = NewAdmission;
    type Patch = AdmissionPatch;

    const NAME: &'static str = "Admission";
    const COLLECTION: &'static str = "admissions";
    const ORDER_BY: &'static str = "created_at DESC, id DESC";
    const PATCHABLE: bool = true;
    const DELETABLE: bool = false;
    const FAILURES: FailureMessages = FailureMessages {
        list: "Failed to fetch admissions",
        create: "Failed to save admission",
        update: "Failed to update admission",
        delete: "Failed to delete admission",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn build(id: i64, created_at: DateTime<Utc>, new: NewAdmission) -> Self {
        Admission {
            id,
            full_name: new.full_name,
            date_of_birth: new.date_of_birth,
            gender: new.gender,
            nationality: new.nationality,
            parent_name: new.parent_name,
            contact_number: new.contact_number,
            email: new.email,
            address: new.address,
            course: new.course,
            previous_school: new.previous_school,
            grade_percentage: new.grade_percentage,
            status: AdmissionStatus::Pending,
            created_at,
        }
    }

    fn columns(&self) -> Vec<(&'static str, Column)> {
        vec![
            ("full_name", self.full_name.clone().into()),
            ("date_of_birth", self.date_of_birth.clone().into()),
            ("gender", self.gender.clone().into()),
            ("nationality", self.nationality.clone().into()),
            ("parent_name", self.parent_name.clone().into()),
            ("contact_number", self.contact_number.clone().into()),
            ("email", self.email.clone().into()),
            ("address", self.address.clone().into()),
            ("course", self.course.clone().into()),
            ("previous_school", self.previous_school.clone().into()),
            ("grade_percentage", self.grade_percentage.clone().into()),
            ("status", self.status.as_str().into()),
            ("created_at", self.created_at.into()),
        ]
    }

    fn apply(&mut self, patch: &AdmissionPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn patch_columns(patch: &AdmissionPatch) -> Vec<(&'static str, Column)> {
        patch
            .status
            .map(|status| ("status", Column::from(status.as_str())))
            .into_iter()
            .collect()
    }

    fn ordering(a: &Self, b: &Self) -> Ordering {
        newest_first((a.created_at, a.id), (b.created_at, b.id))
    }

    /// A decision only lands on a record that is still Pending.
    fn patch_guard(patch: &AdmissionPatch) -> Vec<(&'static str, Column)> {
        match patch.status {
            Some(_) => vec![("status", Column::from(AdmissionStatus::Pending.as_str()))],
            None => Vec::new(),
        }
    }

    /// Applications are decided once: Pending moves to Approved or Rejected
    /// and never back.
    fn check_patch(&self, patch: &AdmissionPatch) -> Result<()> {
        match patch.status {
            None => Ok(()),
            Some(AdmissionStatus::Pending) => Err(AppError::InvalidTransition(
                "an admission cannot be moved back to Pending".to_string(),
            )),
            Some(next) if self.status != AdmissionStatus::Pending => {
                Err(AppError::InvalidTransition(format!(
                    "admission is already {}, cannot change to {}",
                    self.status, next
                )))
            }
            Some(_) => Ok(()),
        }
    }
}
