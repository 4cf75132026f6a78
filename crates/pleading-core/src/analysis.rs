//! Legal analysis shown on the review step.
//!
//! The causes of action and violations come from a fixed FCRA table; the
//! only input is the list of source filenames.

use serde::Serialize;

use crate::state::basename;

/// Sources assumed when nothing has been selected yet.
pub const DEFAULT_SOURCE_DOCS: [&str; 4] = [
    "Attorney_Notes.txt",
    "Adverse_Action_Letter_Cap_One.pdf",
    "Civil_Cover_Sheet.txt",
    "Complaint_Final.docx",
];

pub const EXTRACTION_DATE: &str = "June 5, 2025";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegalAnalysis {
    pub extraction_date: String,
    pub source_docs: Vec<String>,
    pub causes_of_action: Vec<CauseOfAction>,
    pub legal_violations: Vec<LegalViolation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CauseOfAction {
    pub title: String,
    pub description: String,
    pub statutory_basis: String,
    pub source_doc: String,
    pub elements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegalViolation {
    pub statute: String,
    pub violation_type: String,
    pub description: String,
    pub source_doc: String,
    pub penalties: String,
}

struct CauseRow {
    title: &'static str,
    description: &'static str,
    statutory_basis: &'static str,
    source_doc: &'static str,
    elements: [&'static str; 4],
}

struct ViolationRow {
    statute: &'static str,
    violation_type: &'static str,
    description: &'static str,
    source_doc: &'static str,
    penalties: &'static str,
}

static CAUSES: [CauseRow; 3] = [
    CauseRow {
        title: "Negligent Non-Compliance with FCRA",
        description: "Defendants negligently failed to follow reasonable procedures to assure maximum possible accuracy of consumer credit information",
        statutory_basis: "15 U.S.C. § 1681e(b)",
        source_doc: "Complaint_Final.docx",
        elements: [
            "Duty to maintain reasonable procedures",
            "Failure to assure maximum possible accuracy",
            "Reporting of inaccurate information",
            "Proximately caused damages to consumer",
        ],
    },
    CauseRow {
        title: "Willful Non-Compliance with FCRA",
        description: "Defendants willfully failed to conduct reasonable reinvestigation upon consumer dispute",
        statutory_basis: "15 U.S.C. § 1681i(a)",
        source_doc: "Attorney_Notes.txt",
        elements: [
            "Received consumer dispute",
            "Failed to conduct reasonable reinvestigation",
            "Willful or reckless disregard for consumer rights",
            "Continued reporting of disputed information",
        ],
    },
    CauseRow {
        title: "Failure to Provide Required Notices",
        description: "Defendants failed to provide adverse action notices as required by FCRA",
        statutory_basis: "15 U.S.C. § 1681m(a)",
        source_doc: "Adverse_Action_Letter_Cap_One.pdf",
        elements: [
            "Use of consumer report in adverse action",
            "Failure to provide timely notice",
            "Inadequate disclosure of consumer rights",
            "Damages from lack of notice",
        ],
    },
];

static VIOLATIONS: [ViolationRow; 6] = [
    ViolationRow {
        statute: "15 U.S.C. § 1681e(b)",
        violation_type: "Negligent Failure - Reasonable Procedures",
        description: "Consumer reporting agency failed to follow reasonable procedures to assure maximum possible accuracy of information concerning the consumer",
        source_doc: "Complaint_Final.docx",
        penalties: "Actual damages, attorney fees, and costs",
    },
    ViolationRow {
        statute: "15 U.S.C. § 1681i(a)(1)(A)",
        violation_type: "Willful Failure - Reinvestigation Duties",
        description: "Upon dispute, consumer reporting agency failed to conduct reasonable reinvestigation to determine whether the disputed information is inaccurate",
        source_doc: "Attorney_Notes.txt",
        penalties: "Actual damages OR statutory damages $100-$1,000, plus attorney fees",
    },
    ViolationRow {
        statute: "15 U.S.C. § 1681i(a)(5)(A)",
        violation_type: "Failure to Delete - Disputed Information",
        description: "Failed to promptly delete inaccurate or unverifiable information from consumer's file following dispute",
        source_doc: "Attorney_Notes.txt",
        penalties: "Actual damages, attorney fees, and costs",
    },
    ViolationRow {
        statute: "15 U.S.C. § 1681c(a)(2)",
        violation_type: "Reporting Prohibited Information",
        description: "Continued reporting of adverse account information beyond the permissible time periods",
        source_doc: "Adverse_Action_Letter_Cap_One.pdf",
        penalties: "Actual damages, attorney fees, and costs",
    },
    ViolationRow {
        statute: "15 U.S.C. § 1681m(a)",
        violation_type: "Adverse Action Notice Violations",
        description: "Failed to provide required adverse action notices with consumer reporting agency information",
        source_doc: "Adverse_Action_Letter_Cap_One.pdf",
        penalties: "Actual damages, attorney fees, and costs",
    },
    ViolationRow {
        statute: "15 U.S.C. § 1681n",
        violation_type: "Willful Non-Compliance - Civil Liability",
        description: "Pattern of willful non-compliance with FCRA requirements causing consumer harm",
        source_doc: "Complaint_Final.docx",
        penalties: "Actual damages OR $100-$1,000 statutory damages, plus punitive damages and attorney fees",
    },
];

/// Builds the analysis for the given source filenames.
pub fn analyze(filenames: &[String]) -> LegalAnalysis {
    LegalAnalysis {
        extraction_date: EXTRACTION_DATE.to_string(),
        source_docs: source_docs_or_default(filenames),
        causes_of_action: CAUSES
            .iter()
            .map(|row| CauseOfAction {
                title: row.title.to_string(),
                description: row.description.to_string(),
                statutory_basis: row.statutory_basis.to_string(),
                source_doc: row.source_doc.to_string(),
                elements: row.elements.iter().map(|e| e.to_string()).collect(),
            })
            .collect(),
        legal_violations: VIOLATIONS
            .iter()
            .map(|row| LegalViolation {
                statute: row.statute.to_string(),
                violation_type: row.violation_type.to_string(),
                description: row.description.to_string(),
                source_doc: row.source_doc.to_string(),
                penalties: row.penalties.to_string(),
            })
            .collect(),
    }
}

/// Basenames of document paths, preserving order.
pub fn basenames<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    paths
        .iter()
        .map(|path| basename(path.as_ref()).to_string())
        .collect()
}

pub(crate) fn source_docs_or_default(filenames: &[String]) -> Vec<String> {
    if filenames.is_empty() {
        DEFAULT_SOURCE_DOCS.iter().map(|s| s.to_string()).collect()
    } else {
        filenames.to_vec()
    }
}
