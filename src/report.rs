use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::filter::FilterCounts;

/// Handle returned when a report object has been created in a workspace.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportHandle {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

/// One entry in the objects-created section of a report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedObject {
    #[serde(rename = "ref")]
    pub reference: String,
    pub description: String,
}

/// Summary of one extended filter run, stored alongside its data artifacts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterReport {
    pub workspace_name: String,
    pub input_assembly_ref: String,
    pub output_assembly_ref: String,
    pub counts: FilterCounts,
    pub objects_created: Vec<CreatedObject>,
    pub text_message: String,
}

impl FilterReport {
    pub fn new(
        workspace_name: impl Into<String>,
        input_assembly_ref: impl Into<String>,
        output_assembly_ref: impl Into<String>,
        output_assembly_name: &str,
        counts: FilterCounts,
    ) -> Self {
        let input_assembly_ref = input_assembly_ref.into();
        let output_assembly_ref = output_assembly_ref.into();

        let objects_created = vec![CreatedObject {
            reference: output_assembly_ref.clone(),
            description: format!("Filtered contigs for {}", output_assembly_name),
        }];

        let text_message = format!(
            "Filtered assembly {}: kept {} of {} contigs ({} removed)",
            input_assembly_ref,
            counts.n_contigs_remaining,
            counts.n_initial_contigs,
            counts.n_contigs_removed
        );

        Self {
            workspace_name: workspace_name.into(),
            input_assembly_ref,
            output_assembly_ref,
            counts,
            objects_created,
            text_message,
        }
    }

    /// Plain-text rendering of the report body.
    pub fn render(&self) -> String {
        let objects = self
            .objects_created
            .iter()
            .map(|object| format!("  {} - {}", object.reference, object.description))
            .join("\n");

        format!("{}\nObjects created:\n{}", self.text_message, objects)
    }
}
