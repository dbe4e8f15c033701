//! Application settings: per-department workflows, SLA settings and job types.
//!
//! Settings are stored as three JSON documents keyed by [`SettingKey`].
//! A document that is missing or fails to decode falls back to the built-in
//! defaults below.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::department::{
    DeptSettings, Officer, DEPT_ADMINISTRATION, DEPT_LAND_TECHNICAL, DEPT_REGISTRATION,
    DEPT_SURVEY,
};
use crate::sla::SlaThresholds;
use crate::workflow::WorkflowStep;

pub type Workflows = BTreeMap<String, Vec<WorkflowStep>>;
pub type DeptSettingsMap = BTreeMap<String, DeptSettings>;
pub type JobTypes = BTreeMap<String, Vec<String>>;

/// Key of a settings document in the settings store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Workflows,
    DeptSettings,
    JobTypes,
}

impl SettingKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Workflows => "workflows",
            SettingKey::DeptSettings => "dept_settings",
            SettingKey::JobTypes => "job_types",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All settings documents, decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub workflows: Workflows,
    pub dept_settings: DeptSettingsMap,
    pub job_types: JobTypes,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            workflows: default_workflows(),
            dept_settings: default_dept_settings(),
            job_types: default_job_types(),
        }
    }
}

impl AppSettings {
    /// Build settings from raw stored documents, defaulting each one that is
    /// absent or malformed.
    pub fn from_documents(
        workflows: Option<Value>,
        dept_settings: Option<Value>,
        job_types: Option<Value>,
    ) -> Self {
        Self {
            workflows: decode_or(workflows, default_workflows),
            dept_settings: decode_or(dept_settings, default_dept_settings),
            job_types: decode_or(job_types, default_job_types),
        }
    }

    /// The workflow of `department`, empty when it has none.
    pub fn workflow_for(&self, department: &str) -> &[WorkflowStep] {
        self.workflows
            .get(department)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Workflow shown on the public tracking page: the job's department's,
    /// or the registration workflow when the department has none.
    pub fn tracking_workflow_for(&self, department: &str) -> &[WorkflowStep] {
        match self.workflows.get(department) {
            Some(steps) if !steps.is_empty() => steps,
            _ => self.workflow_for(DEPT_REGISTRATION),
        }
    }

    pub fn dept_settings_for(&self, department: &str) -> DeptSettings {
        self.dept_settings
            .get(department)
            .cloned()
            .unwrap_or_default()
    }

    /// SLA thresholds for `department`; the defaults for unknown departments.
    pub fn thresholds_for(&self, department: &str) -> SlaThresholds {
        self.dept_settings
            .get(department)
            .map(DeptSettings::thresholds)
            .unwrap_or_default()
    }

    pub fn job_types_for(&self, department: &str) -> &[String] {
        self.job_types
            .get(department)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn decode_or<T: DeserializeOwned>(value: Option<Value>, default: fn() -> T) -> T {
    value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_else(default)
}

fn steps(names: &[&str]) -> Vec<WorkflowStep> {
    names
        .iter()
        .zip(1..)
        .map(|(name, id)| WorkflowStep::new(id, *name))
        .collect()
}

fn officer(id: i64, name: &str, phone: &str) -> Officer {
    Officer {
        id,
        name: name.to_string(),
        phone: Some(phone.to_string()),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_workflows() -> Workflows {
    BTreeMap::from([
        (
            DEPT_REGISTRATION.to_string(),
            steps(&[
                "รับเรื่อง / ตรวจสอบเอกสาร",
                "ตรวจสอบหลักทรัพย์",
                "เสนอเจ้าพนักงานที่ดิน",
                "ชำระค่าธรรมเนียม / จดทะเบียน",
                "แจกหนังสือสำคัญ",
            ]),
        ),
        (
            DEPT_SURVEY.to_string(),
            steps(&[
                "รับเรื่อง / นัดรังวัด",
                "วางเงินมัดจำรังวัด",
                "ช่างออกไปทำการรังวัด",
                "คำนวณ / เขียนแผนที่",
                "ตรวจรูปแผนที่ / สารบบ",
                "ส่งฝ่ายทะเบียนดำเนินการต่อ",
            ]),
        ),
        (
            DEPT_LAND_TECHNICAL.to_string(),
            steps(&[
                "รับเรื่องร้องเรียน / หารือ",
                "ตรวจสอบข้อเท็จจริง / ข้อกฎหมาย",
                "สรุปเรื่องเสนอความเห็น",
                "เจ้าพนักงานที่ดินพิจารณา",
                "แจ้งผลการพิจารณา",
            ]),
        ),
        (
            DEPT_ADMINISTRATION.to_string(),
            steps(&[
                "รับหนังสือเข้า",
                "เสนอหัวหน้าฝ่ายอำนวยการ",
                "เจ้าหน้าที่ดำเนินการ / พิมพ์หนังสือ",
                "เสนอลงนาม",
                "ออกเลขหนังสือส่ง / ส่งไปรษณีย์",
            ]),
        ),
    ])
}

pub fn default_dept_settings() -> DeptSettingsMap {
    BTreeMap::from([
        (
            DEPT_REGISTRATION.to_string(),
            DeptSettings {
                warning_days: 3,
                critical_days: 7,
                officers: vec![
                    officer(1, "นายทะเบียน ใจดี", "042-511-123"),
                    officer(2, "นางสาวคล่องแคล่ว ว่องไว", "081-234-5678"),
                ],
            },
        ),
        (
            DEPT_SURVEY.to_string(),
            DeptSettings {
                warning_days: 30,
                critical_days: 60,
                officers: vec![officer(1, "นายช่าง แม่นยำ", "089-999-9999")],
            },
        ),
        (
            DEPT_LAND_TECHNICAL.to_string(),
            DeptSettings {
                warning_days: 15,
                critical_days: 30,
                officers: Vec::new(),
            },
        ),
        (
            DEPT_ADMINISTRATION.to_string(),
            DeptSettings {
                warning_days: 5,
                critical_days: 10,
                officers: vec![officer(1, "นางอำนวย สะดวก", "042-511-200")],
            },
        ),
    ])
}

pub fn default_job_types() -> JobTypes {
    BTreeMap::from([
        (
            DEPT_SURVEY.to_string(),
            strings(&[
                "รังวัดสอบเขต",
                "รังวัดแบ่งแยก",
                "รังวัดรวมโฉนด",
                "รังวัดออกโฉนด",
                "รังวัดตรวจสอบเนื้อที่",
                "รังวัดทำแผนที่ลงระวาง",
            ]),
        ),
        (
            DEPT_REGISTRATION.to_string(),
            strings(&[
                "จดทะเบียนขายฝาก",
                "จดทะเบียนจำนอง",
                "จดทะเบียนโอนมรดก",
                "จดทะเบียนให้",
                "จดทะเบียนลงชื่อคู่สมรส",
            ]),
        ),
        (
            DEPT_LAND_TECHNICAL.to_string(),
            strings(&[
                "หารือระเบียบ",
                "ตรวจสอบข้อเท็จจริง",
                "ร้องเรียนการปฏิบัติหน้าที่",
                "ขอทราบราคาประเมิน",
            ]),
        ),
        (
            DEPT_ADMINISTRATION.to_string(),
            strings(&[
                "งานสารบรรณ",
                "งานการเจ้าหน้าที่",
                "งานพัสดุ",
                "งานการเงินและบัญชี",
            ]),
        ),
    ])
}
