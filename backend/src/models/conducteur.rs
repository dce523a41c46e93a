//! Run-sheets ("conducteurs") and their ordered segments.
//!
//! A run-sheet is authored by a host for one episode of a program. Its
//! segments carry a 1-based `order` that stays contiguous through every edit:
//! removal and drag-reorder renumber the whole list. Field validation is
//! deferred to save time, see [`Conducteur::validate_for_save`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ConducteurId, ElementId, ProgramId, TenantId, UserId};
use super::time::TimeOfDay;
use super::validation::{is_blank, ValidationErrors};

/// Editorial workflow status of a run-sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConducteurStatus {
    Draft,
    Pending,
    Validated,
    Rejected,
}

impl ConducteurStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConducteurStatus::Draft => "draft",
            ConducteurStatus::Pending => "pending",
            ConducteurStatus::Validated => "validated",
            ConducteurStatus::Rejected => "rejected",
        }
    }

    /// Whether the author may still change the content.
    pub fn is_editable(&self) -> bool {
        match self {
            ConducteurStatus::Draft | ConducteurStatus::Rejected => true,
            ConducteurStatus::Pending | ConducteurStatus::Validated => false,
        }
    }
}

impl FromStr for ConducteurStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(ConducteurStatus::Draft),
            "pending" => Ok(ConducteurStatus::Pending),
            "validated" => Ok(ConducteurStatus::Validated),
            "rejected" => Ok(ConducteurStatus::Rejected),
            other => Err(format!("Unknown conducteur status: {}", other)),
        }
    }
}

impl fmt::Display for ConducteurStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of segment in a run-sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    Introduction,
    #[default]
    Feature,
    Guest,
    Music,
    Ad,
    Weather,
    Newsflash,
    Column,
    Conclusion,
}

impl SegmentType {
    pub fn has_guest(&self) -> bool {
        matches!(self, SegmentType::Guest)
    }

    pub fn has_track(&self) -> bool {
        matches!(self, SegmentType::Music)
    }
}

/// One segment of a run-sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConducteurElement {
    pub id: Option<ElementId>,
    pub conducteur_id: Option<ConducteurId>,
    /// 1-based position, contiguous within the run-sheet
    pub order: u32,
    #[serde(rename = "type")]
    pub kind: SegmentType,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub scheduled_time: Option<TimeOfDay>,
    #[serde(default)]
    pub technical_notes: Option<String>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub music_title: Option<String>,
    #[serde(default)]
    pub music_artist: Option<String>,
}

impl ConducteurElement {
    /// A blank segment of the default type at `order`.
    pub fn blank(order: u32) -> Self {
        Self {
            order,
            ..Default::default()
        }
    }

    /// Apply a single field edit. No validation happens here.
    pub fn apply(&mut self, field: ElementField) {
        match field {
            ElementField::Kind(kind) => {
                self.kind = kind;
                if !kind.has_guest() {
                    self.guest_name = None;
                }
                if !kind.has_track() {
                    self.music_title = None;
                    self.music_artist = None;
                }
            }
            ElementField::Title(title) => self.title = title,
            ElementField::Description(value) => self.description = value,
            ElementField::DurationMinutes(value) => self.duration_minutes = value,
            ElementField::ScheduledTime(value) => self.scheduled_time = value,
            ElementField::TechnicalNotes(value) => self.technical_notes = value,
            ElementField::GuestName(value) => self.guest_name = value,
            ElementField::MusicTitle(value) => self.music_title = value,
            ElementField::MusicArtist(value) => self.music_artist = value,
        }
    }
}

/// A typed `(field, value)` edit on a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ElementField {
    Kind(SegmentType),
    Title(String),
    Description(Option<String>),
    DurationMinutes(Option<u32>),
    ScheduledTime(Option<TimeOfDay>),
    TechnicalNotes(Option<String>),
    GuestName(Option<String>),
    MusicTitle(Option<String>),
    MusicArtist(Option<String>),
}

/// Errors raised by list edits on a run-sheet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunSheetError {
    #[error("segment index {index} out of range (run-sheet has {len} segments)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Rewrite `order` as `1..=N` following slice order.
pub fn renumber(elements: &mut [ConducteurElement]) {
    for (position, element) in elements.iter_mut().enumerate() {
        element.order = position as u32 + 1;
    }
}

/// Move one segment from `from` to `to`, then renumber the whole list.
pub fn reorder(
    mut elements: Vec<ConducteurElement>,
    from: usize,
    to: usize,
) -> Result<Vec<ConducteurElement>, RunSheetError> {
    let len = elements.len();
    for index in [from, to] {
        if index >= len {
            return Err(RunSheetError::IndexOutOfRange { index, len });
        }
    }
    let moved = elements.remove(from);
    elements.insert(to, moved);
    renumber(&mut elements);
    Ok(elements)
}

/// Sum of segment durations; a missing duration counts as zero.
pub fn total_duration(elements: &[ConducteurElement]) -> u32 {
    elements
        .iter()
        .map(|e| e.duration_minutes.unwrap_or(0))
        .sum()
}

/// The editable segment list of a run-sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunSheet {
    elements: Vec<ConducteurElement>,
}

impl RunSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing list, renumbering it.
    pub fn from_elements(mut elements: Vec<ConducteurElement>) -> Self {
        elements.sort_by_key(|e| e.order);
        renumber(&mut elements);
        Self { elements }
    }

    pub fn elements(&self) -> &[ConducteurElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<ConducteurElement> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a blank segment and return its index.
    pub fn add_element(&mut self) -> usize {
        let order = self.elements.len() as u32 + 1;
        self.elements.push(ConducteurElement::blank(order));
        self.elements.len() - 1
    }

    pub fn update_element(&mut self, index: usize, field: ElementField) -> Result<(), RunSheetError> {
        let len = self.elements.len();
        let element = self
            .elements
            .get_mut(index)
            .ok_or(RunSheetError::IndexOutOfRange { index, len })?;
        element.apply(field);
        Ok(())
    }

    pub fn remove_element(&mut self, index: usize) -> Result<ConducteurElement, RunSheetError> {
        let len = self.elements.len();
        if index >= len {
            return Err(RunSheetError::IndexOutOfRange { index, len });
        }
        let removed = self.elements.remove(index);
        renumber(&mut self.elements);
        Ok(removed)
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), RunSheetError> {
        let elements = std::mem::take(&mut self.elements);
        let len = elements.len();
        if from >= len || to >= len {
            self.elements = elements;
            return Err(RunSheetError::IndexOutOfRange {
                index: from.max(to),
                len,
            });
        }
        self.elements = reorder(elements, from, to)?;
        Ok(())
    }

    pub fn total_duration(&self) -> u32 {
        total_duration(&self.elements)
    }
}

/// A run-sheet with its segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conducteur {
    pub id: Option<ConducteurId>,
    pub tenant: TenantId,
    /// Authoring host
    pub host_id: UserId,
    pub program_id: Option<ProgramId>,
    pub title: String,
    pub broadcast_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<TimeOfDay>,
    #[serde(default)]
    pub end_time: Option<TimeOfDay>,
    pub status: ConducteurStatus,
    /// Director's comment, present only while rejected
    #[serde(default)]
    pub rejection_comment: Option<String>,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub elements: Vec<ConducteurElement>,
}

impl Conducteur {
    pub fn total_duration(&self) -> u32 {
        total_duration(&self.elements)
    }

    /// Save-time checks. Every issue is reported, nothing is written on failure.
    pub fn validate_for_save(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if is_blank(&self.title) {
            errors.push("title", "Title is required");
        }
        if self.broadcast_date.is_none() {
            errors.push("broadcast_date", "Broadcast date is required");
        }
        if self.program_id.is_none() {
            errors.push("program_id", "A program must be selected");
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                errors.push("end_time", format!("End time {} must be after {}", end, start));
            }
        }
        if self.elements.is_empty() {
            errors.push("elements", "Add at least one segment");
        }
        for (index, element) in self.elements.iter().enumerate() {
            if is_blank(&element.title) {
                errors.push(
                    format!("elements[{}].title", index),
                    format!("Segment {} needs a title", index + 1),
                );
            }
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(titles: &[&str]) -> Vec<ConducteurElement> {
        let mut sheet = RunSheet::new();
        for title in titles {
            let index = sheet.add_element();
            sheet
                .update_element(index, ElementField::Title(title.to_string()))
                .unwrap();
        }
        sheet.into_elements()
    }

    fn orders(elements: &[ConducteurElement]) -> Vec<u32> {
        elements.iter().map(|e| e.order).collect()
    }

    fn titles(elements: &[ConducteurElement]) -> Vec<&str> {
        elements.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_add_element_appends_with_next_order() {
        let mut sheet = RunSheet::new();
        assert_eq!(sheet.add_element(), 0);
        assert_eq!(sheet.add_element(), 1);
        assert_eq!(orders(sheet.elements()), vec![1, 2]);
        assert_eq!(sheet.elements()[1].kind, SegmentType::Feature);
    }

    #[test]
    fn test_remove_middle_renumbers() {
        let mut sheet = RunSheet::from_elements(titled(&["a", "b", "c"]));
        let removed = sheet.remove_element(1).unwrap();
        assert_eq!(removed.title, "b");
        assert_eq!(orders(sheet.elements()), vec![1, 2]);
        assert_eq!(titles(sheet.elements()), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut sheet = RunSheet::new();
        assert_eq!(
            sheet.remove_element(0),
            Err(RunSheetError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_reorder_moves_and_renumbers() {
        let moved = reorder(titled(&["a", "b", "c", "d"]), 0, 2).unwrap();
        assert_eq!(titles(&moved), vec!["b", "c", "a", "d"]);
        assert_eq!(orders(&moved), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_reorder_out_of_range_keeps_list() {
        let mut sheet = RunSheet::from_elements(titled(&["a", "b"]));
        assert!(sheet.reorder(0, 5).is_err());
        assert_eq!(titles(sheet.elements()), vec!["a", "b"]);
    }

    #[test]
    fn test_total_duration_treats_missing_as_zero() {
        let mut sheet = RunSheet::from_elements(titled(&["a", "b", "c"]));
        sheet
            .update_element(0, ElementField::DurationMinutes(Some(5)))
            .unwrap();
        sheet
            .update_element(2, ElementField::DurationMinutes(Some(12)))
            .unwrap();
        assert_eq!(sheet.total_duration(), 17);
    }

    #[test]
    fn test_changing_type_clears_specific_fields() {
        let mut element = ConducteurElement::blank(1);
        element.apply(ElementField::Kind(SegmentType::Music));
        element.apply(ElementField::MusicTitle(Some("Yéké Yéké".to_string())));
        element.apply(ElementField::MusicArtist(Some("Mory Kanté".to_string())));
        element.apply(ElementField::Kind(SegmentType::Guest));
        assert!(element.music_title.is_none());
        assert!(element.music_artist.is_none());

        element.apply(ElementField::GuestName(Some("Invité".to_string())));
        element.apply(ElementField::Kind(SegmentType::Guest));
        assert_eq!(element.guest_name.as_deref(), Some("Invité"));
    }

    #[test]
    fn test_from_elements_sorts_by_order() {
        let mut elements = titled(&["a", "b", "c"]);
        elements.reverse();
        let sheet = RunSheet::from_elements(elements);
        assert_eq!(titles(sheet.elements()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_element_field_json_shape() {
        let field: ElementField =
            serde_json::from_str(r#"{"field":"duration_minutes","value":4}"#).unwrap();
        assert_eq!(field, ElementField::DurationMinutes(Some(4)));
    }

    #[test]
    fn test_status_editability() {
        assert!(ConducteurStatus::Draft.is_editable());
        assert!(ConducteurStatus::Rejected.is_editable());
        assert!(!ConducteurStatus::Pending.is_editable());
        assert!(!ConducteurStatus::Validated.is_editable());
    }
}
