// Copyright 2018-2020 Cargill Incorporated
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub mod auth;
pub mod notifications;
pub mod users;

use std::cmp;

use chrono::{Local, TimeZone};

/// Output layout for list commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Format {
    Human,
    Csv,
}

impl Format {
    pub fn from_arg(value: Option<&str>) -> Self {
        match value {
            Some("csv") => Format::Csv,
            _ => Format::Human,
        }
    }
}

fn print_table(format: Format, column_names: Vec<&str>, row_values: Vec<Vec<String>>) {
    match format {
        Format::Csv => print_csv(column_names, row_values),
        Format::Human => print_human_readable(column_names, row_values),
    }
}

fn print_csv(column_names: Vec<&str>, row_values: Vec<Vec<String>>) {
    let header_row = column_names
        .iter()
        .map(|column| format!("\"{}\"", column))
        .collect::<Vec<_>>()
        .join(",");
    println!("{}", header_row);

    for row in row_values {
        let print_row = row
            .iter()
            .take(column_names.len())
            .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(",");
        println!("{}", print_row);
    }
}

fn print_human_readable(column_names: Vec<&str>, row_values: Vec<Vec<String>>) {
    let widths = column_widths(&column_names, &row_values);

    let header_row = column_names
        .iter()
        .zip(widths.iter())
        .map(|(name, width)| format!("{:width$}", name, width = width))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", header_row.trim_end());

    for row in row_values {
        let print_row = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{}", print_row.trim_end());
    }
}

fn column_widths(column_names: &[&str], row_values: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = column_names.iter().map(|name| name.len()).collect();
    for row in row_values {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = cmp::max(*width, cell.chars().count());
        }
    }
    widths
}

/// Formats a timestamp in milliseconds since the epoch as local time.
fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_widths() {
        let widths = column_widths(
            &["ID", "TITLE"],
            &[
                vec!["n1".to_string(), "Short".to_string()],
                vec!["n100".to_string(), "Longer title".to_string()],
            ],
        );

        assert_eq!(widths, vec![4, 12]);
    }

    #[test]
    fn test_format_from_arg() {
        assert_eq!(Format::from_arg(Some("csv")), Format::Csv);
        assert_eq!(Format::from_arg(Some("human")), Format::Human);
        assert_eq!(Format::from_arg(None), Format::Human);
    }
}
