use comfy_table::Table;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

#[derive(Debug, Clone, Copy, clap::ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl OutputFormat {
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table)
    }
}

pub fn print_output<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    println!("{}", render(data, format)?);
    Ok(())
}

pub fn render<T: Serialize>(data: T, format: OutputFormat) -> Result<String> {
    let json_value = serde_json::to_value(data)?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json_value)?,
        OutputFormat::Yaml => serde_yaml::to_string(&json_value)?
            .trim_end()
            .to_string(),
        OutputFormat::Table => render_table(&json_value),
    };

    Ok(rendered)
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Array(arr) if arr.is_empty() => "(none)".to_string(),
        Value::Array(arr) => {
            let mut table = Table::new();

            // Get headers from first object
            if let Value::Object(first) = &arr[0] {
                let headers: Vec<String> = first.keys().cloned().collect();
                table.set_header(&headers);

                for item in arr {
                    if let Value::Object(obj) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| format_value(obj.get(h).unwrap_or(&Value::Null)))
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                // Simple array of values
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![format_value(item)]);
                }
            }

            table.to_string()
        }
        Value::Object(obj) => {
            let mut table = Table::new();
            table.set_header(vec!["Key", "Value"]);

            for (key, val) in obj {
                table.add_row(vec![key.clone(), format_value(val)]);
            }

            table.to_string()
        }
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_uses_first_object_keys_as_headers() {
        let out = render(
            json!([
                {"profile": "account-dev", "alias": "dev"},
                {"profile": "account-prod", "alias": "prod"}
            ]),
            OutputFormat::Table,
        )
        .unwrap();

        let header = out.lines().nth(1).unwrap();
        assert!(header.contains("profile"));
        assert!(header.contains("alias"));
        assert!(out.contains("account-prod"));
    }

    #[test]
    fn test_table_for_empty_list() {
        assert_eq!(render(json!([]), OutputFormat::Table).unwrap(), "(none)");
    }

    #[test]
    fn test_table_joins_string_lists() {
        let out = render(
            json!({"regions": ["us-east-1", "sa-east-1"]}),
            OutputFormat::Table,
        )
        .unwrap();
        assert!(out.contains("us-east-1, sa-east-1"));
    }

    #[test]
    fn test_json_and_yaml() {
        let data = json!({"rows": 3, "report": null});
        let json_out = render(&data, OutputFormat::Json).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&json_out).unwrap(), data);

        let yaml_out = render(&data, OutputFormat::Yaml).unwrap();
        assert!(yaml_out.contains("rows: 3"));
        assert!(!yaml_out.ends_with('\n'));
    }
}
