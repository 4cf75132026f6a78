//! Structured preview of the complaint.
//!
//! The body text is a fixed FCRA complaint; only the generation date and the
//! source document list vary with the request.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::analysis::{source_docs_or_default, DEFAULT_SOURCE_DOCS};

pub const PREVIEW_TITLE: &str = "COMPLAINT FOR VIOLATIONS OF THE FAIR CREDIT REPORTING ACT";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewDocument {
    pub title: String,
    /// e.g. `June 5, 2025`.
    pub generated_date: String,
    pub source_docs: Vec<String>,
    pub content: Vec<PreviewSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewSection {
    pub title: String,
    pub content: String,
    pub highlights: Vec<Highlight>,
}

/// A span of section text attributed to a source document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub text: String,
    pub source_doc: String,
    pub start: usize,
    pub end: usize,
}

struct SectionText {
    title: &'static str,
    content: &'static str,
}

/// Builds the preview dated today in local time.
pub fn build_preview(filenames: &[String]) -> PreviewDocument {
    build_preview_on(filenames, Local::now().date_naive())
}

pub fn build_preview_on(filenames: &[String], date: NaiveDate) -> PreviewDocument {
    PreviewDocument {
        title: PREVIEW_TITLE.to_string(),
        generated_date: date.format("%B %-d, %Y").to_string(),
        source_docs: source_docs_or_default(filenames),
        content: SECTIONS
            .iter()
            .map(|section| PreviewSection {
                title: section.title.to_string(),
                content: section.content.to_string(),
                highlights: Vec::new(),
            })
            .collect(),
    }
}

static SECTIONS: [SectionText; 9] = [
    SectionText {
        title: "UNITED STATES DISTRICT COURT",
        content: "EASTERN DISTRICT OF NEW YORK\n\nEMAN YOUSSEF,\n\n\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\tPlaintiff,\n\nv.\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\tCivil Action No. _______\n\nEQUIFAX INFORMATION SERVICES LLC,\nEXPERIAN INFORMATION SOLUTIONS INC.,\nTRANS UNION LLC,\n\n\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\tDefendants.\n\n____________________________________________________________________________",
    },
    SectionText {
        title: "COMPLAINT",
        content: "Plaintiff Eman Youssef, by and through undersigned counsel, brings this action against Defendants for violations of the Fair Credit Reporting Act (\"FCRA\"), 15 U.S.C. § 1681 et seq., and alleges as follows:",
    },
    SectionText {
        title: "I. JURISDICTION AND VENUE",
        content: "1. This Court has subject matter jurisdiction over this action pursuant to 15 U.S.C. § 1681p and 28 U.S.C. § 1331, as this action arises under federal law.\n\n2. Venue is proper in this District pursuant to 28 U.S.C. § 1391(b) because a substantial part of the events giving rise to the claims occurred in this judicial district, and Defendants conduct business in this District.\n\n3. This Court has personal jurisdiction over the Defendants because they conduct substantial business within this District and/or the acts giving rise to this lawsuit occurred within this District.",
    },
    SectionText {
        title: "II. PARTIES",
        content: "4. Plaintiff Eman Youssef is an individual residing in Queens, New York. Plaintiff may be reached at 347.891.5584.\n\n5. Upon information and belief, Defendant EQUIFAX INFORMATION SERVICES LLC is a limited liability company organized and existing under the laws of Georgia, with its principal place of business located in Atlanta, Georgia. Equifax is a \"consumer reporting agency\" as that term is defined in 15 U.S.C. § 1681a(f).\n\n6. Upon information and belief, Defendant EXPERIAN INFORMATION SOLUTIONS INC. is a corporation organized and existing under the laws of Delaware, with its principal place of business located in Costa Mesa, California. Experian is a \"consumer reporting agency\" as that term is defined in 15 U.S.C. § 1681a(f).\n\n7. Upon information and belief, Defendant TRANS UNION LLC is a limited liability company organized and existing under the laws of Delaware, with its principal place of business located in Chicago, Illinois. Trans Union is a \"consumer reporting agency\" as that term is defined in 15 U.S.C. § 1681a(f).",
    },
    SectionText {
        title: "III. FACTUAL ALLEGATIONS",
        content: "8. During the period from June 30, 2024 through July 30, 2024, Plaintiff was traveling in Egypt.\n\n9. While Plaintiff was traveling in Egypt, fraudulent charges totaling approximately $7,500 were made on Plaintiff's TD Bank credit card account.\n\n10. Upon discovering the fraudulent charges, Plaintiff immediately contacted TD Bank to report the unauthorized transactions and dispute the charges.\n\n11. Plaintiff filed a police report regarding the fraudulent transactions and provided all necessary documentation to TD Bank.\n\n12. Despite Plaintiff's timely notification and dispute of the fraudulent charges, the unauthorized accounts and/or adverse information related to these fraudulent transactions continue to appear on Plaintiff's consumer credit reports maintained by Defendants.\n\n13. The continued reporting of this fraudulent and inaccurate information has damaged Plaintiff's credit score and creditworthiness.\n\n14. As a result of Defendants' actions, Plaintiff has been denied credit and has suffered actual damages.",
    },
    SectionText {
        title: "IV. FIRST CAUSE OF ACTION",
        content: "NEGLIGENT NON-COMPLIANCE WITH THE FCRA\n(15 U.S.C. § 1681e(b) and 15 U.S.C. § 1681o)\n\n15. Plaintiff incorporates by reference each and every allegation contained in the preceding paragraphs as if fully set forth herein.\n\n16. At all times relevant hereto, Defendants were \"consumer reporting agencies\" within the meaning of 15 U.S.C. § 1681a(f).\n\n17. Defendants owed a duty to Plaintiff to follow reasonable procedures to assure maximum possible accuracy of the information concerning Plaintiff in Plaintiff's consumer credit file.\n\n18. Defendants negligently violated this duty by failing to follow reasonable procedures to assure the maximum possible accuracy of the information in Plaintiff's credit file.\n\n19. As a direct and proximate result of Defendants' negligent violations of the FCRA, Plaintiff has suffered actual damages.",
    },
    SectionText {
        title: "V. SECOND CAUSE OF ACTION",
        content: "WILLFUL NON-COMPLIANCE WITH THE FCRA\n(15 U.S.C. § 1681i(a) and 15 U.S.C. § 1681n)\n\n20. Plaintiff incorporates by reference each and every allegation contained in the preceding paragraphs as if fully set forth herein.\n\n21. Upon receiving notice of Plaintiff's dispute regarding the inaccurate information, Defendants were required to conduct a reasonable reinvestigation of the disputed information.\n\n22. Defendants willfully failed to conduct a reasonable reinvestigation as required by 15 U.S.C. § 1681i(a).\n\n23. Defendants' conduct was willful and in reckless disregard of Plaintiff's rights under the FCRA.\n\n24. As a direct and proximate result of Defendants' willful violations of the FCRA, Plaintiff has suffered actual damages and is entitled to statutory damages.",
    },
    SectionText {
        title: "VI. PRAYER FOR RELIEF",
        content: "WHEREFORE, Plaintiff respectfully requests that this Court:\n\nA. Enter judgment in favor of Plaintiff and against Defendants;\n\nB. Award Plaintiff actual damages pursuant to 15 U.S.C. § 1681o and § 1681n;\n\nC. Award Plaintiff statutory damages in the amount of not less than $100 nor more than $1,000 for each willful violation pursuant to 15 U.S.C. § 1681n;\n\nD. Award Plaintiff punitive damages pursuant to 15 U.S.C. § 1681n;\n\nE. Award Plaintiff reasonable attorney's fees and costs pursuant to 15 U.S.C. § 1681o and § 1681n;\n\nF. Grant such other and further relief as this Court may deem just and proper.",
    },
    SectionText {
        title: "JURY DEMAND",
        content: "Plaintiff hereby demands a trial by jury on all issues so triable.\n\n\nRespectfully submitted,\n\n_________________________\nKevin Mallon, Esq.\nAttorney for Plaintiff\nState Bar No. [Number]\n[Address]\n[Phone]\n[Email]",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_follow_complaint_order() {
        let preview = build_preview(&[]);
        let titles: Vec<&str> = preview.content.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "UNITED STATES DISTRICT COURT",
                "COMPLAINT",
                "I. JURISDICTION AND VENUE",
                "II. PARTIES",
                "III. FACTUAL ALLEGATIONS",
                "IV. FIRST CAUSE OF ACTION",
                "V. SECOND CAUSE OF ACTION",
                "VI. PRAYER FOR RELIEF",
                "JURY DEMAND",
            ]
        );
        assert_eq!(preview.title, PREVIEW_TITLE);
    }

    #[test]
    fn date_is_month_day_year() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        let preview = build_preview_on(&["a.pdf".to_string()], date);
        assert_eq!(preview.generated_date, "June 5, 2025");
        assert_eq!(preview.source_docs, ["a.pdf"]);
    }

    #[test]
    fn empty_selection_uses_default_sources() {
        let preview = build_preview(&[]);
        assert_eq!(preview.source_docs, DEFAULT_SOURCE_DOCS);
    }

    #[test]
    fn caption_names_all_defendants() {
        let caption = &build_preview(&[]).content[0].content;
        assert!(caption.starts_with("EASTERN DISTRICT OF NEW YORK"));
        for defendant in ["EQUIFAX", "EXPERIAN", "TRANS UNION"] {
            assert!(caption.contains(defendant));
        }
    }
}
