//! Text rendering for employee rows and hierarchy trees.

use crate::args::OutputFormat;
use miette::{IntoDiagnostic, Result};
use staffdb_core::{Employee, EmployeeRow, HierarchyEntry, HierarchyNode};
use tabled::{builder::Builder, settings::Style};

const HEADERS: [&str; 6] = ["ID", "Full name", "Position", "Hire date", "Salary", "Manager"];

/// Renders rows in the requested format; table output ends with a count line.
pub fn rows(rows: &[EmployeeRow], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(table(rows)),
        OutputFormat::Csv => csv(rows),
        OutputFormat::Json => serde_json::to_string_pretty(rows).into_diagnostic(),
    }
}

fn cells(row: &EmployeeRow) -> [String; 6] {
    [
        row.id.to_string(),
        row.full_name.clone(),
        row.position.clone(),
        row.hire_date.to_string(),
        row.salary.to_string(),
        row.manager_name.clone().unwrap_or_default(),
    ]
}

fn table(rows: &[EmployeeRow]) -> String {
    let mut output = String::new();
    if !rows.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(HEADERS);
        for row in rows {
            builder.push_record(cells(row));
        }
        output.push_str(&builder.build().with(Style::rounded()).to_string());
        output.push('\n');
    }
    output.push_str(&format!("{} record(s) found", rows.len()));
    output
}

fn csv(rows: &[EmployeeRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["id", "full_name", "position", "hire_date", "salary", "boss_name"])
        .into_diagnostic()?;
    for row in rows {
        writer.write_record(cells(row)).into_diagnostic()?;
    }
    let bytes = writer.into_inner().into_diagnostic()?;
    String::from_utf8(bytes).into_diagnostic()
}

/// Key/value card for one employee followed by their management chain.
pub fn employee_card(employee: &Employee, chain: &[Employee]) -> String {
    let mut builder = Builder::default();
    for (label, value) in [
        ("ID", employee.id.to_string()),
        ("Full name", employee.full_name.clone()),
        ("Position", employee.position.clone()),
        ("Hire date", employee.hire_date.to_string()),
        ("Salary", employee.salary.to_string()),
    ] {
        builder.push_record([label.to_string(), value]);
    }
    let mut output = builder.build().with(Style::modern()).to_string();

    output.push('\n');
    if chain.is_empty() {
        output.push_str("Reports to: nobody (top of hierarchy)");
    } else {
        let names: Vec<String> = chain
            .iter()
            .map(|manager| format!("{} [{}]", manager.full_name, manager.id))
            .collect();
        output.push_str(&format!("Reports to: {}", names.join(" -> ")));
    }
    output
}

/// Draws a nested tree with box characters, children in id order.
pub fn tree(root: &HierarchyNode) -> String {
    let mut lines = vec![node_label(&root.entry)];
    let count = root.children.len();
    for (index, child) in root.children.iter().enumerate() {
        push_subtree(&mut lines, child, "", index + 1 == count);
    }
    lines.join("\n")
}

fn push_subtree(lines: &mut Vec<String>, node: &HierarchyNode, prefix: &str, last: bool) {
    let (branch, indent) = if last {
        ("└── ", "    ")
    } else {
        ("├── ", "│   ")
    };
    lines.push(format!("{prefix}{branch}{}", node_label(&node.entry)));

    let child_prefix = format!("{prefix}{indent}");
    let count = node.children.len();
    for (index, child) in node.children.iter().enumerate() {
        push_subtree(lines, child, &child_prefix, index + 1 == count);
    }
}

fn node_label(entry: &HierarchyEntry) -> String {
    format!("{} [{}] {}", entry.full_name, entry.id, entry.position)
}

/// One `level<TAB>id<TAB>name` line per entry, in traversal order.
pub fn flat_tree(entries: &[HierarchyEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}\t{}\t{}", entry.level, entry.id, entry.full_name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{flat_tree, rows, tree};
    use crate::args::OutputFormat;
    use chrono::NaiveDate;
    use staffdb_core::{nest, EmployeeRow, HierarchyEntry};

    fn row(id: i64, name: &str, manager: Option<&str>) -> EmployeeRow {
        EmployeeRow {
            id,
            full_name: name.to_string(),
            position: "Engineer".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            salary: 90000,
            manager_id: manager.map(|_| 1),
            manager_name: manager.map(str::to_string),
        }
    }

    fn entry(id: i64, name: &str, manager_id: Option<i64>, level: u32) -> HierarchyEntry {
        HierarchyEntry {
            id,
            full_name: name.to_string(),
            position: "Staff".to_string(),
            manager_id,
            level,
        }
    }

    #[test]
    fn table_ends_with_record_count() {
        let output = rows(&[row(1, "Ada", None), row(2, "Linus", Some("Ada"))], OutputFormat::Table)
            .unwrap();
        assert!(output.contains("Linus"));
        assert!(output.ends_with("2 record(s) found"));

        let empty = rows(&[], OutputFormat::Table).unwrap();
        assert_eq!(empty, "0 record(s) found");
    }

    #[test]
    fn csv_quotes_embedded_commas() {
        let output = rows(&[row(2, "Torvalds, Linus", Some("Ada"))], OutputFormat::Csv).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("id,full_name,position,hire_date,salary,boss_name")
        );
        assert_eq!(
            lines.next(),
            Some("2,\"Torvalds, Linus\",Engineer,2020-01-15,90000,Ada")
        );
    }

    #[test]
    fn json_serializes_rows() {
        let output = rows(&[row(1, "Ada", None)], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["full_name"], "Ada");
        assert_eq!(value[0]["hire_date"], "2020-01-15");
        assert!(value[0]["manager_name"].is_null());
    }

    #[test]
    fn tree_draws_branches() {
        let entries = vec![
            entry(1, "CEO", None, 1),
            entry(2, "Manager", Some(1), 2),
            entry(4, "Assistant", Some(1), 2),
            entry(3, "Dev", Some(2), 3),
        ];
        let node = nest(&entries).unwrap();
        assert_eq!(
            tree(&node),
            "CEO [1] Staff\n\
             ├── Manager [2] Staff\n\
             │   └── Dev [3] Staff\n\
             └── Assistant [4] Staff"
        );
        assert_eq!(
            flat_tree(&entries),
            "1\t1\tCEO\n2\t2\tManager\n2\t4\tAssistant\n3\t3\tDev"
        );
    }
}
