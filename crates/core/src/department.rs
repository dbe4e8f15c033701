//! Departments of the land office and their per-department settings.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sla::SlaThresholds;

pub const DEPT_REGISTRATION: &str = "ฝ่ายทะเบียน";
pub const DEPT_SURVEY: &str = "ฝ่ายรังวัด";
pub const DEPT_LAND_TECHNICAL: &str = "กลุ่มงานวิชาการที่ดิน";
pub const DEPT_ADMINISTRATION: &str = "ฝ่ายอำนวยการ";

/// All departments, in display order.
pub const DEPARTMENTS: &[&str] = &[
    DEPT_REGISTRATION,
    DEPT_SURVEY,
    DEPT_LAND_TECHNICAL,
    DEPT_ADMINISTRATION,
];

/// Office switchboard number used when no officer phone is known.
pub const DEFAULT_CONTACT_PHONE: &str = "042-511-200";

/// Shown as the responsible officer when a job has no assignee.
pub const DEFAULT_OFFICER_NAME: &str = "เจ้าหน้าที่สำนักงานที่ดิน";

/// Reception-number prefix for a department (empty for unknown ones).
pub fn reception_prefix(department: &str) -> &'static str {
    match department {
        DEPT_REGISTRATION => "R",
        DEPT_SURVEY => "S",
        DEPT_LAND_TECHNICAL => "L",
        DEPT_ADMINISTRATION => "A",
        _ => "",
    }
}

pub fn validate_department(department: &str) -> Result<(), CoreError> {
    if DEPARTMENTS.contains(&department) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown department '{department}'. Must be one of: {}",
            DEPARTMENTS.join(", ")
        )))
    }
}

/// A staff member that jobs can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// SLA thresholds and officer roster of one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeptSettings {
    #[serde(alias = "warning", alias = "warningDays")]
    pub warning_days: i64,
    #[serde(alias = "critical", alias = "criticalDays")]
    pub critical_days: i64,
    #[serde(default)]
    pub officers: Vec<Officer>,
}

impl Default for DeptSettings {
    fn default() -> Self {
        let t = SlaThresholds::default();
        Self {
            warning_days: t.warning_days,
            critical_days: t.critical_days,
            officers: Vec::new(),
        }
    }
}

impl DeptSettings {
    pub fn thresholds(&self) -> SlaThresholds {
        SlaThresholds::new(self.warning_days, self.critical_days)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.thresholds().validate()?;
        if let Some(officer) = self.officers.iter().find(|o| o.name.trim().is_empty()) {
            return Err(CoreError::Validation(format!(
                "Officer {} has an empty name",
                officer.id
            )));
        }
        Ok(())
    }

    /// Phone to call about a job handled by `officer_name`.
    ///
    /// Falls back to the first officer with a phone, then to the office number.
    pub fn contact_phone(&self, officer_name: Option<&str>) -> &str {
        officer_name
            .and_then(|name| self.officers.iter().find(|o| o.name == name))
            .and_then(|o| o.phone.as_deref())
            .or_else(|| self.officers.first().and_then(|o| o.phone.as_deref()))
            .unwrap_or(DEFAULT_CONTACT_PHONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DeptSettings {
        DeptSettings {
            warning_days: 3,
            critical_days: 7,
            officers: vec![
                Officer {
                    id: 1,
                    name: "นายทะเบียน ใจดี".into(),
                    phone: Some("042-511-123".into()),
                },
                Officer {
                    id: 2,
                    name: "นางสาวคล่องแคล่ว ว่องไว".into(),
                    phone: Some("081-234-5678".into()),
                },
            ],
        }
    }

    #[test]
    fn prefixes() {
        assert_eq!(reception_prefix(DEPT_REGISTRATION), "R");
        assert_eq!(reception_prefix(DEPT_SURVEY), "S");
        assert_eq!(reception_prefix(DEPT_LAND_TECHNICAL), "L");
        assert_eq!(reception_prefix(DEPT_ADMINISTRATION), "A");
        assert_eq!(reception_prefix("อื่น ๆ"), "");
    }

    #[test]
    fn contact_phone_prefers_named_officer() {
        assert_eq!(
            settings().contact_phone(Some("นางสาวคล่องแคล่ว ว่องไว")),
            "081-234-5678"
        );
    }

    #[test]
    fn contact_phone_falls_back_to_first_officer() {
        assert_eq!(settings().contact_phone(Some("ไม่มีชื่อนี้")), "042-511-123");
        assert_eq!(settings().contact_phone(None), "042-511-123");
    }

    #[test]
    fn contact_phone_falls_back_to_office() {
        assert_eq!(DeptSettings::default().contact_phone(None), DEFAULT_CONTACT_PHONE);
    }

    #[test]
    fn unknown_department_rejected() {
        assert!(validate_department(DEPT_SURVEY).is_ok());
        assert!(validate_department("ฝ่ายบัญชี").is_err());
    }

    #[test]
    fn legacy_settings_shape_decodes() {
        let json = serde_json::json!({
            "warning": 30,
            "critical": 60,
            "officers": [{ "id": 1, "name": "นายช่าง แม่นยำ", "phone": "089-999-9999" }]
        });
        let s: DeptSettings = serde_json::from_value(json).unwrap();
        assert_eq!(s.thresholds(), SlaThresholds::new(30, 60));
        assert_eq!(s.officers.len(), 1);
    }
}
