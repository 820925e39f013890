//! Business rules for todo items, independent of storage.
//!
//! Every mutation goes through [`TodoDomain`] so that name validation and
//! timestamp maintenance live in one place. Rendering is a pure function
//! over the items handed in; ordering is the caller's job.

use crate::error::{Result, TodoError};
use crate::model::item::{Item, UNSAVED_ID};
use chrono::{DateTime, Local, Utc};
use std::borrow::Cow;
use std::fmt::Write as _;
use unicode_width::UnicodeWidthStr;

/// Text rendered for an empty list.
pub const EMPTY_LIST_TEXT: &str = "No todo items...\n";

/// Spaces between table columns.
pub const COLUMN_PADDING: usize = 4;

/// Timestamp layout used in the table.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Indicator for a completed item.
pub const COMPLETED_ICON: &str = "✓";

/// Indicator for an item that is still open.
pub const OPEN_ICON: &str = "✗";

const HEADERS: [&str; 5] = ["ID", "Name", "Last Updated", "Created", "Is Completed"];

/// Stateless domain service.
#[derive(Debug, Clone, Copy, Default)]
pub struct TodoDomain;

impl TodoDomain {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Build a new, unsaved item named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] when `name` is empty.
    pub fn create_item(&self, name: &str) -> Result<Item> {
        if name.is_empty() {
            return Err(TodoError::validation("create todo", "name cannot be empty"));
        }
        let now = Utc::now();
        Ok(Item::new(UNSAVED_ID, name, false, now, now))
    }

    /// Rename `item` in place and refresh its `updated_at`.
    ///
    /// On error the item is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] when `name` is empty.
    pub fn update_item_name<'a>(&self, name: &str, item: &'a mut Item) -> Result<&'a mut Item> {
        if name.is_empty() {
            return Err(TodoError::validation(
                format!("rename todo {}", item.id()),
                "name cannot be empty",
            ));
        }
        item.set_name(name);
        item.touch(Utc::now());
        Ok(item)
    }

    /// Mark `item` completed and refresh its `updated_at`.
    ///
    /// Completing an already completed item only refreshes the timestamp.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps the mutation contract uniform
    /// with [`TodoDomain::update_item_name`].
    pub fn complete_item<'a>(&self, item: &'a mut Item) -> Result<&'a mut Item> {
        item.set_completed(true);
        item.touch(Utc::now());
        Ok(item)
    }

    /// Render `items` as an aligned, newline-terminated table.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Render`] if writing into the buffer fails.
    pub fn render_table(&self, items: &[Item]) -> Result<String> {
        if items.is_empty() {
            return Ok(EMPTY_LIST_TEXT.to_string());
        }

        let rows: Vec<[String; 5]> = items
            .iter()
            .map(|item| {
                [
                    item.id().to_string(),
                    name_cell(item.name()).into_owned(),
                    format_timestamp(item.updated_at()),
                    format_timestamp(item.created_at()),
                    completion_icon(item.is_completed()).to_string(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(display_width);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(cell));
            }
        }

        let separator = HEADERS.map(|header| "-".repeat(display_width(header)));

        let mut out = String::new();
        write_row(&mut out, &HEADERS, &widths)?;
        write_row(&mut out, &separator, &widths)?;
        for row in &rows {
            write_row(&mut out, row, &widths)?;
        }
        Ok(out)
    }
}

/// Format a stored timestamp the way the table shows it (local time).
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

/// Indicator shown in the "Is Completed" column.
#[must_use]
pub const fn completion_icon(is_completed: bool) -> &'static str {
    if is_completed { COMPLETED_ICON } else { OPEN_ICON }
}

/// Name as shown in a table cell, with control characters escaped so a row
/// always stays on one line.
fn name_cell(name: &str) -> Cow<'_, str> {
    if !name.chars().any(char::is_control) {
        return Cow::Borrowed(name);
    }
    let mut escaped = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_control() {
            escaped.extend(ch.escape_default());
        } else {
            escaped.push(ch);
        }
    }
    Cow::Owned(escaped)
}

/// Terminal columns occupied by `cell`; wide (e.g. CJK) characters count twice.
fn display_width(cell: impl AsRef<str>) -> usize {
    UnicodeWidthStr::width(cell.as_ref())
}

fn write_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) -> std::fmt::Result {
    let last = cells.len().saturating_sub(1);
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let cell = cell.as_ref();
        if i == last {
            write!(out, "{cell}")?;
        } else {
            let pad = width - display_width(cell) + COLUMN_PADDING;
            write!(out, "{cell}{:pad$}", "")?;
        }
    }
    writeln!(out)
}
