//! Static report table: slug, title, endpoint and table columns per report.

use serde::Serialize;

pub const DASHBOARD_SLUG: &str = "dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub header: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Audit,
    PatientAccess,
    PatientService,
    Recommendation,
    Delivery,
    Signed,
    Practitioner,
    Sync,
    Unsigned,
}

impl ReportKind {
    pub const ALL: [ReportKind; 9] = [
        ReportKind::Audit,
        ReportKind::PatientAccess,
        ReportKind::PatientService,
        ReportKind::Recommendation,
        ReportKind::Delivery,
        ReportKind::Signed,
        ReportKind::Practitioner,
        ReportKind::Sync,
        ReportKind::Unsigned,
    ];

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::Audit => "audit",
            ReportKind::PatientAccess => "patient-access",
            ReportKind::PatientService => "patient-service",
            ReportKind::Recommendation => "recommendation",
            ReportKind::Delivery => "delivery",
            ReportKind::Signed => "signed",
            ReportKind::Practitioner => "practitioner",
            ReportKind::Sync => "sync",
            ReportKind::Unsigned => "unsigned",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Audit => "Audit Summary",
            ReportKind::PatientAccess => "Patient Access",
            ReportKind::PatientService => "Patient Service Usage",
            ReportKind::Recommendation => "Recommendation Summary",
            ReportKind::Delivery => "Report Delivery Schedules",
            ReportKind::Signed => "Signed Notes",
            ReportKind::Practitioner => "Practitioner Service Usage",
            ReportKind::Sync => "Sync Issues",
            ReportKind::Unsigned => "Unsigned Notes",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            ReportKind::Audit => "/api/audit-summary",
            ReportKind::PatientAccess => "/api/patient-access",
            ReportKind::PatientService => "/api/patient-service-usage",
            ReportKind::Recommendation => "/api/recommendation-summary",
            ReportKind::Delivery => "/api/delivery-schedules",
            ReportKind::Signed => "/api/signed-notes",
            ReportKind::Practitioner => "/api/practitioner-service-usage",
            ReportKind::Sync => "/api/sync-issues",
            ReportKind::Unsigned => "/api/unsigned-notes",
        }
    }

    pub fn columns(&self) -> &'static [ColumnSpec] {
        match self {
            ReportKind::Audit => &[
                ColumnSpec { key: "date", header: "Date" },
                ColumnSpec { key: "action", header: "Action" },
                ColumnSpec { key: "user", header: "User" },
                ColumnSpec { key: "status", header: "Status" },
                ColumnSpec { key: "details", header: "Details" },
            ],
            ReportKind::PatientAccess => &[
                ColumnSpec { key: "patientId", header: "Patient ID" },
                ColumnSpec { key: "patientName", header: "Patient Name" },
                ColumnSpec { key: "accessDate", header: "Access Date" },
                ColumnSpec { key: "accessType", header: "Access Type" },
                ColumnSpec { key: "duration", header: "Duration" },
            ],
            ReportKind::PatientService => &[
                ColumnSpec { key: "serviceName", header: "Service Name" },
                ColumnSpec { key: "usageCount", header: "Usage Count" },
                ColumnSpec { key: "totalTime", header: "Total Time" },
                ColumnSpec { key: "lastUsed", header: "Last Used" },
            ],
            ReportKind::Recommendation => &[
                ColumnSpec { key: "id", header: "ID" },
                ColumnSpec { key: "type", header: "Type" },
                ColumnSpec { key: "priority", header: "Priority" },
                ColumnSpec { key: "status", header: "Status" },
                ColumnSpec { key: "createdDate", header: "Created Date" },
            ],
            ReportKind::Delivery => &[
                ColumnSpec { key: "reportName", header: "Report Name" },
                ColumnSpec { key: "frequency", header: "Frequency" },
                ColumnSpec { key: "nextDelivery", header: "Next Delivery" },
                ColumnSpec { key: "status", header: "Status" },
            ],
            ReportKind::Signed => &[
                ColumnSpec { key: "noteId", header: "Note ID" },
                ColumnSpec { key: "patientName", header: "Patient Name" },
                ColumnSpec { key: "practitioner", header: "Practitioner" },
                ColumnSpec { key: "signedDate", header: "Signed Date" },
                ColumnSpec { key: "status", header: "Status" },
            ],
            ReportKind::Practitioner => &[
                ColumnSpec { key: "practitionerName", header: "Practitioner" },
                ColumnSpec { key: "visits", header: "Visits" },
                ColumnSpec { key: "totalTime", header: "Total Time" },
                ColumnSpec { key: "lastActive", header: "Last Active" },
            ],
            ReportKind::Sync => &[
                ColumnSpec { key: "id", header: "Issue ID" },
                ColumnSpec { key: "type", header: "Type" },
                ColumnSpec { key: "severity", header: "Severity" },
                ColumnSpec { key: "status", header: "Status" },
                ColumnSpec { key: "reportedDate", header: "Reported Date" },
            ],
            ReportKind::Unsigned => &[
                ColumnSpec { key: "noteId", header: "Note ID" },
                ColumnSpec { key: "patientName", header: "Patient Name" },
                ColumnSpec { key: "practitioner", header: "Practitioner" },
                ColumnSpec { key: "createdDate", header: "Created Date" },
                ColumnSpec { key: "daysPending", header: "Days Pending" },
            ],
        }
    }
}

/// Title shown for a section slug, including the dashboard itself.
pub fn section_title(slug: &str) -> &'static str {
    if slug == DASHBOARD_SLUG {
        return "Dashboard";
    }
    ReportKind::from_slug(slug)
        .map(|kind| kind.title())
        .unwrap_or("Report")
}

#[cfg(test)]
#[path = "tests/reports_tests.rs"]
mod tests;
