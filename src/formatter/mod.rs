//! Output formatting for one-shot commands and REPL feedback
//!
//! - Tables (tabled) for completion items, the schema and generated forms
//! - Pretty JSON, colorized with colored_json when color is enabled
//! - Plain token lists for scripts and shell completion

use colored_json::prelude::*;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Modify, Style,
        object::{Columns, Rows},
        width::Width,
    },
};

use crate::chat::FormRequest;
use crate::completion::{CompletionItem, NavigationSchema, Prefix};
use crate::config::{DisplayConfig, OutputFormat};
use crate::error::Result;

/// Maximum width of the label column (characters)
const MAX_LABEL_WIDTH: usize = 48;

/// Shown instead of an empty item list
pub const NO_RESULTS: &str = "No results found";

/// Main formatter
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    /// Output format type
    format: OutputFormat,

    /// Enable colored output
    use_colors: bool,
}

/// One completion item as printed
#[derive(Debug, Serialize)]
struct ItemRow<'a> {
    token: String,
    path: &'a str,
    label: &'a str,
    terminal: bool,
}

/// One schema path as printed
#[derive(Debug, Serialize)]
struct SchemaRow<'a> {
    token: String,
    label: &'a str,
    kind: &'static str,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format` - Output format type
    /// * `use_colors` - Enable colored output
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self { format, use_colors }
    }

    /// Formatter following the display configuration
    pub fn from_config(display: &DisplayConfig) -> Self {
        Self::new(display.format, display.color_output)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format resolved completion items
    ///
    /// # Arguments
    /// * `prefix` - Prefix the items were resolved under
    /// * `items` - Items in display order
    pub fn format_items(&self, prefix: Prefix, items: &[CompletionItem]) -> Result<String> {
        let rows: Vec<ItemRow<'_>> = items
            .iter()
            .map(|item| ItemRow {
                token: format!("{prefix}{}", item.path),
                path: &item.path,
                label: &item.label,
                terminal: item.is_terminal,
            })
            .collect();

        match self.format {
            OutputFormat::Json => self.to_json(&rows),
            OutputFormat::Plain => Ok(rows
                .iter()
                .map(|row| row.token.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if rows.is_empty() {
                    return Ok(NO_RESULTS.to_string());
                }
                let records = rows.iter().map(|row| {
                    vec![
                        row.token.clone(),
                        row.label.to_string(),
                        if row.terminal { "terminal" } else { "branch" }.to_string(),
                    ]
                });
                Ok(self.table(["Path", "Label", "Kind"], records))
            }
        }
    }

    /// Format every reachable path of both namespaces
    pub fn format_schema(&self, schema: &NavigationSchema) -> Result<String> {
        let rows: Vec<SchemaRow<'_>> = Prefix::ALL
            .into_iter()
            .flat_map(move |prefix| {
                schema
                    .entries(prefix)
                    .into_iter()
                    .map(move |(path, segment)| SchemaRow {
                        token: format!("{prefix}{path}"),
                        label: &segment.label,
                        kind: segment.kind_name(),
                    })
            })
            .collect();

        match self.format {
            OutputFormat::Json => self.to_json(&rows),
            OutputFormat::Plain => Ok(rows
                .iter()
                .map(|row| row.token.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let records = rows.iter().map(|row| {
                    vec![
                        row.token.clone(),
                        row.label.to_string(),
                        row.kind.to_string(),
                    ]
                });
                Ok(self.table(["Path", "Label", "Kind"], records))
            }
        }
    }

    /// Format a generated form as a two-column table
    pub fn format_form(&self, form: &FormRequest) -> String {
        let mut builder = Builder::default();
        builder.push_record([form.heading(), String::new()]);
        builder.push_record(["Title".to_string(), form.title.clone()]);
        builder.push_record([
            "Generated from".to_string(),
            format!("\"{}...\"", form.excerpt),
        ]);

        let mut table = builder.build();
        table.with(Style::rounded());
        table.with(Modify::new(Columns::new(1..=1)).with(Width::wrap(MAX_LABEL_WIDTH)));
        if self.use_colors {
            table.modify(Rows::first(), Color::FG_MAGENTA | Color::BOLD);
        }
        table.to_string()
    }

    fn table<I>(&self, header: [&str; 3], records: I) -> String
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut builder = Builder::default();
        builder.push_record(header.iter().map(|name| name.to_string()));
        for record in records {
            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.with(Modify::new(Columns::new(1..=1)).with(Width::wrap(MAX_LABEL_WIDTH)));
        table.with(Modify::new(Rows::first()).with(Alignment::center()));
        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }
        table.to_string()
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json_str = serde_json::to_string_pretty(value)?;
        if self.use_colors {
            Ok(json_str.to_colored_json_auto().unwrap_or(json_str))
        } else {
            Ok(json_str)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<CompletionItem> {
        vec![
            CompletionItem {
                path: "library/".to_string(),
                label: "Library".to_string(),
                is_terminal: false,
            },
            CompletionItem {
                path: "integrations".to_string(),
                label: "All integrations".to_string(),
                is_terminal: true,
            },
        ]
    }

    #[test]
    fn test_plain_items() {
        let formatter = Formatter::new(OutputFormat::Plain, false);
        let output = formatter.format_items(Prefix::Target, &items()).unwrap();
        assert_eq!(output, "@/library/\n@/integrations");
    }

    #[test]
    fn test_json_items() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_items(Prefix::Target, &items()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[0]["token"], "@/library/");
        assert_eq!(value[1]["terminal"], true);
    }

    #[test]
    fn test_table_items() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_items(Prefix::Operation, &[]).unwrap();
        assert_eq!(output, NO_RESULTS);

        let output = formatter.format_items(Prefix::Target, &items()).unwrap();
        assert!(output.contains("@/library/"));
        assert!(output.contains("All integrations"));
        assert!(output.contains("branch"));
    }

    #[test]
    fn test_schema_plain_lists_both_namespaces() {
        let formatter = Formatter::new(OutputFormat::Plain, false);
        let output = formatter
            .format_schema(&NavigationSchema::builtin())
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "@/library/");
        assert!(lines.contains(&"@/scheduler/cleanups/"));
        assert!(lines.contains(&"#/publish/collection/"));
    }

    #[test]
    fn test_form_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let form = FormRequest {
            action: "create".to_string(),
            resource: "card".to_string(),
            title: "New card".to_string(),
            excerpt: "#/create/card weekly".to_string(),
        };
        let output = formatter.format_form(&form);

        assert!(output.contains("create card"));
        assert!(output.contains("New card"));
    }
}
