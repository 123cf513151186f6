// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PDF export of the member list

use crate::api::students::StudentProfile;
use crate::dates::format_day_month_year;
use chrono::NaiveDate;
use printpdf::path::PaintMode;
use printpdf::{
	BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Rect,
};
use rgb::RGB8;
use std::error::Error;
use std::fmt;

pub const TITLE: &str = "All Registered Members - Full Details";
pub const COLUMNS: [Column; 7] = [
	Column::new("Name", 36.0).bold(),
	Column::new("Gender", 16.0),
	Column::new("Contact", 22.0),
	Column::new("Residence", 30.0),
	Column::new("Program", 34.0),
	Column::new("Hall", 24.0),
	Column::new("Wings", 28.0),
];
const MISSING_VALUE: &str = "-";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const SIDE_MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 15.0;
/// Every page's table starts here, below the summary on the first page
const TABLE_TOP: f32 = 45.0;

const TITLE_SIZE: f32 = 20.0;
const SUMMARY_SIZE: f32 = 12.0;
const HEADER_SIZE: f32 = 9.0;
const BODY_SIZE: f32 = 8.0;
const CELL_PADDING: f32 = 1.8;
const LINE_SPACING: f32 = 1.15;
const GRID_THICKNESS: f32 = 0.3;

const HEADER_FILL: RGB8 = RGB8::new(30, 64, 175);
const STRIPE_FILL: RGB8 = RGB8::new(245, 249, 255);
const GRID_COLOR: RGB8 = RGB8::new(200, 200, 200);
const TEXT_COLOR: RGB8 = RGB8::new(0, 0, 0);
const HEADER_TEXT_COLOR: RGB8 = RGB8::new(255, 255, 255);

const MM_PER_POINT: f32 = 0.3528;

/// Advance widths of printable ASCII (space through tilde) in thousandths of an em, from the Helvetica AFM
const HELVETICA_WIDTHS: [u16; 95] = [
	278, 278, 355, 556, 556, 889, 667, 222, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556, 556, 556, 556, 556,
	556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
	722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, 222, 556, 556, 500, 556,
	556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334,
	260, 334, 584,
];
/// Advance widths of printable ASCII in thousandths of an em, from the Helvetica-Bold AFM
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
	278, 333, 474, 556, 556, 889, 722, 278, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556, 556, 556, 556, 556,
	556, 556, 556, 333, 333, 584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
	722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, 278, 556, 611, 556, 611,
	556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389,
	280, 389, 584,
];
/// Characters outside printable ASCII are measured as a full em so they never overflow
const FALLBACK_WIDTH: u16 = 1000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FontStyle {
	Regular,
	Bold,
}

impl FontStyle {
	fn glyph_width(&self, character: char) -> u16 {
		let widths = match self {
			Self::Regular => &HELVETICA_WIDTHS,
			Self::Bold => &HELVETICA_BOLD_WIDTHS,
		};
		match u32::from(character).checked_sub(32) {
			Some(index) => widths.get(index as usize).copied().unwrap_or(FALLBACK_WIDTH),
			None => FALLBACK_WIDTH,
		}
	}
}

/// Width of a line of text in millimetres
pub fn text_width(text: &str, font: FontStyle, font_size: f32) -> f32 {
	let units: u32 = text.chars().map(|character| u32::from(font.glyph_width(character))).sum();
	units as f32 / 1000.0 * points_to_mm(font_size)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
	pub title: &'static str,
	pub width: f32,
	pub font: FontStyle,
}

impl Column {
	const fn new(title: &'static str, width: f32) -> Self {
		Self {
			title,
			width,
			font: FontStyle::Regular,
		}
	}

	const fn bold(self) -> Self {
		Self {
			font: FontStyle::Bold,
			..self
		}
	}

	/// Room for text between the cell's padding
	pub fn usable_width(&self) -> f32 {
		self.width - 2.0 * CELL_PADDING
	}
}

#[derive(Debug)]
pub enum ExportError {
	Pdf(printpdf::Error),
}

impl fmt::Display for ExportError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Pdf(error) => write!(f, "Failed to generate the PDF: {:?}", error),
		}
	}
}

impl Error for ExportError {}

impl From<printpdf::Error> for ExportError {
	fn from(error: printpdf::Error) -> Self {
		Self::Pdf(error)
	}
}

/// The name the exported list is saved as
pub fn export_file_name(date: NaiveDate) -> String {
	format!("full-members-list-{}.pdf", date.format("%Y-%m-%d"))
}

/// The table cells for a member, using "-" for anything missing
pub fn member_row(student: &StudentProfile) -> [String; 7] {
	let gender = student.gender.to_string();
	let wings = student.wing_names();
	[
		cell_text(&student.display_name()),
		cell_text(&gender),
		cell_text(&student.contact),
		cell_text(&student.place_of_residence),
		cell_text(student.program_name().unwrap_or_default()),
		cell_text(student.hall_name().unwrap_or_default()),
		cell_text(wings.as_deref().unwrap_or_default()),
	]
}

fn cell_text(value: &str) -> String {
	let value = value.trim();
	if value.is_empty() {
		String::from(MISSING_VALUE)
	} else {
		value.to_string()
	}
}

/// Breaks text into lines no wider than `max_width` millimetres, splitting between words where possible.
/// Words too wide for a line on their own are split between characters.
pub fn wrap_text(text: &str, max_width: f32, font: FontStyle, font_size: f32) -> Vec<String> {
	let fits = |line: &str| text_width(line, font, font_size) <= max_width;
	let mut lines = Vec::new();
	let mut current = String::new();
	for word in text.split_whitespace() {
		let candidate = if current.is_empty() {
			word.to_string()
		} else {
			format!("{} {}", current, word)
		};
		if fits(&candidate) {
			current = candidate;
			continue;
		}
		if !current.is_empty() {
			lines.push(std::mem::take(&mut current));
		}
		for character in word.chars() {
			current.push(character);
			// A single character always stays on its line, even if it's too wide.
			if !fits(&current) && current.chars().count() > 1 {
				current.pop();
				lines.push(std::mem::replace(&mut current, character.to_string()));
			}
		}
	}
	if !current.is_empty() || lines.is_empty() {
		lines.push(current);
	}
	lines
}

fn points_to_mm(points: f32) -> f32 {
	points * MM_PER_POINT
}

fn line_height(font_size: f32) -> f32 {
	points_to_mm(font_size) * LINE_SPACING
}

fn header_height() -> f32 {
	line_height(HEADER_SIZE) + 2.0 * CELL_PADDING
}

/// A table row placed on a page, measured from the top of the page
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedRow {
	pub top: f32,
	pub height: f32,
	pub lines: Vec<Vec<String>>,
	pub striped: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
	/// Where the column header starts
	pub table_top: f32,
	pub rows: Vec<PlacedRow>,
}

/// Splits the rows across pages. Rows are never split; each page repeats the column header.
pub fn layout_pages(rows: &[[String; 7]]) -> Vec<PageLayout> {
	let bottom = PAGE_HEIGHT - BOTTOM_MARGIN;
	let mut pages = vec![PageLayout {
		table_top: TABLE_TOP,
		rows: Vec::new(),
	}];
	let mut y = TABLE_TOP + header_height();

	for (index, row) in rows.iter().enumerate() {
		let lines: Vec<Vec<String>> = row
			.iter()
			.zip(COLUMNS.iter())
			.map(|(text, column)| wrap_text(text, column.usable_width(), column.font, BODY_SIZE))
			.collect();
		let line_count = lines.iter().map(|cell| cell.len()).max().unwrap_or(1);
		let height = line_count as f32 * line_height(BODY_SIZE) + 2.0 * CELL_PADDING;

		let page_has_rows = pages.last().is_some_and(|page| !page.rows.is_empty());
		if y + height > bottom && page_has_rows {
			pages.push(PageLayout {
				table_top: TABLE_TOP,
				rows: Vec::new(),
			});
			y = TABLE_TOP + header_height();
		}

		if let Some(page) = pages.last_mut() {
			page.rows.push(PlacedRow {
				top: y,
				height,
				lines,
				striped: index % 2 == 1,
			});
		}
		y += height;
	}

	pages
}

/// Renders the member list as an A4 PDF
pub fn members_pdf(students: &[StudentProfile], generated_on: NaiveDate) -> Result<Vec<u8>, ExportError> {
	let rows: Vec<[String; 7]> = students.iter().map(member_row).collect();
	let pages = layout_pages(&rows);

	let (document, first_page, first_layer) = PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
	let fonts = Fonts {
		regular: document.add_builtin_font(BuiltinFont::Helvetica)?,
		bold: document.add_builtin_font(BuiltinFont::HelveticaBold)?,
	};

	for (index, page) in pages.iter().enumerate() {
		let layer = if index == 0 {
			let layer = document.get_page(first_page).get_layer(first_layer);
			draw_summary(&layer, &fonts, students.len(), generated_on);
			layer
		} else {
			new_page(&document, index)
		};
		draw_header(&layer, &fonts, page.table_top);
		for row in page.rows.iter() {
			draw_row(&layer, &fonts, row);
		}
	}

	let bytes = document.save_to_bytes()?;
	log::info!(
		"Exported {} members across {} pages ({} bytes)",
		students.len(),
		pages.len(),
		bytes.len()
	);
	Ok(bytes)
}

struct Fonts {
	regular: IndirectFontRef,
	bold: IndirectFontRef,
}

fn new_page(document: &PdfDocumentReference, index: usize) -> PdfLayerReference {
	let (page, layer) = document.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {} Layer 1", index + 1));
	document.get_page(page).get_layer(layer)
}

fn color(color: RGB8) -> Color {
	Color::Rgb(printpdf::Rgb::new(
		f32::from(color.r) / 255.0,
		f32::from(color.g) / 255.0,
		f32::from(color.b) / 255.0,
		None,
	))
}

/// Converts a distance from the top of the page to PDF coordinates
fn from_top(y: f32) -> Mm {
	Mm(PAGE_HEIGHT - y)
}

fn draw_summary(layer: &PdfLayerReference, fonts: &Fonts, total: usize, generated_on: NaiveDate) {
	layer.set_fill_color(color(TEXT_COLOR));
	layer.use_text(TITLE, TITLE_SIZE, Mm(14.0), from_top(20.0), &fonts.bold);
	layer.use_text(
		format!("Total Members: {}", total),
		SUMMARY_SIZE,
		Mm(14.0),
		from_top(30.0),
		&fonts.regular,
	);
	layer.use_text(
		format!("Generated on: {}", format_day_month_year(generated_on)),
		SUMMARY_SIZE,
		Mm(14.0),
		from_top(37.0),
		&fonts.regular,
	);
}

fn fill_rect(layer: &PdfLayerReference, fill: RGB8, left: f32, top: f32, width: f32, height: f32) {
	layer.set_fill_color(color(fill));
	layer.add_rect(
		Rect::new(Mm(left), from_top(top + height), Mm(left + width), from_top(top)).with_mode(PaintMode::Fill),
	);
}

/// Outlines each cell of a row
fn draw_grid(layer: &PdfLayerReference, top: f32, height: f32) {
	layer.set_outline_color(color(GRID_COLOR));
	layer.set_outline_thickness(GRID_THICKNESS);
	let mut left = SIDE_MARGIN;
	for column in COLUMNS.iter() {
		let right = left + column.width;
		layer.add_line(Line {
			points: vec![
				(Point::new(Mm(left), from_top(top)), false),
				(Point::new(Mm(right), from_top(top)), false),
				(Point::new(Mm(right), from_top(top + height)), false),
				(Point::new(Mm(left), from_top(top + height)), false),
			],
			is_closed: true,
		});
		left = right;
	}
}

fn draw_header(layer: &PdfLayerReference, fonts: &Fonts, top: f32) {
	let height = header_height();
	fill_rect(layer, HEADER_FILL, SIDE_MARGIN, top, PAGE_WIDTH - 2.0 * SIDE_MARGIN, height);
	draw_grid(layer, top, height);

	layer.set_fill_color(color(HEADER_TEXT_COLOR));
	let baseline = top + CELL_PADDING + points_to_mm(HEADER_SIZE) * 0.8;
	let mut left = SIDE_MARGIN;
	for column in COLUMNS.iter() {
		let title_width = text_width(column.title, FontStyle::Bold, HEADER_SIZE);
		let x = left + ((column.width - title_width) / 2.0).max(CELL_PADDING);
		layer.use_text(column.title, HEADER_SIZE, Mm(x), from_top(baseline), &fonts.bold);
		left += column.width;
	}
}

fn draw_row(layer: &PdfLayerReference, fonts: &Fonts, row: &PlacedRow) {
	if row.striped {
		fill_rect(
			layer,
			STRIPE_FILL,
			SIDE_MARGIN,
			row.top,
			PAGE_WIDTH - 2.0 * SIDE_MARGIN,
			row.height,
		);
	}
	draw_grid(layer, row.top, row.height);

	layer.set_fill_color(color(TEXT_COLOR));
	let first_baseline = row.top + CELL_PADDING + points_to_mm(BODY_SIZE) * 0.8;
	let mut left = SIDE_MARGIN;
	for (column, cell) in COLUMNS.iter().zip(row.lines.iter()) {
		let font = match column.font {
			FontStyle::Regular => &fonts.regular,
			FontStyle::Bold => &fonts.bold,
		};
		for (line_index, line) in cell.iter().enumerate() {
			let baseline = first_baseline + line_index as f32 * line_height(BODY_SIZE);
			layer.use_text(
				line.as_str(),
				BODY_SIZE,
				Mm(left + CELL_PADDING),
				from_top(baseline),
				font,
			);
		}
		left += column.width;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::lookups::{Hall, Wing};
	use crate::api::students::{test_profile, Gender};

	fn row(name: &str) -> [String; 7] {
		[
			name.to_string(),
			String::from("Female"),
			String::from("0244123456"),
			String::from("Legon Hall"),
			String::from("Computer Science"),
			String::from("Legon Hall"),
			String::from("-"),
		]
	}

	#[test]
	fn columns_fill_the_page_between_margins() {
		let total: f32 = COLUMNS.iter().map(|column| column.width).sum();
		assert!((total - (PAGE_WIDTH - 2.0 * SIDE_MARGIN)).abs() < 0.01);
	}

	#[test]
	fn file_name_uses_iso_date() {
		let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
		assert_eq!(export_file_name(date), "full-members-list-2026-10-19.pdf");
	}

	#[test]
	fn missing_values_become_dashes() {
		let mut student = test_profile(1, "Ama", "Mensah", Gender::Female);
		student.hall = Some(Hall {
			id: 1,
			name: String::from("Legon Hall"),
		});
		student.wings = vec![
			Wing {
				id: 1,
				name: String::from("Choir"),
			},
			Wing {
				id: 2,
				name: String::from("Ushering"),
			},
		];
		let cells = member_row(&student);
		assert_eq!(cells[0], "Ama Mensah");
		assert_eq!(cells[4], "-");
		assert_eq!(cells[5], "Legon Hall");
		assert_eq!(cells[6], "Choir, Ushering");
	}

	#[test]
	fn names_are_measured_in_bold() {
		assert!(
			text_width("AKUA SERWAA BOATEMAA", FontStyle::Bold, BODY_SIZE)
				> text_width("AKUA SERWAA BOATEMAA", FontStyle::Regular, BODY_SIZE)
		);
		let name = &COLUMNS[0];
		assert_eq!(name.font, FontStyle::Bold);
		let lines = wrap_text("AKUA SERWAA BOATEMAA", name.usable_width(), name.font, BODY_SIZE);
		assert_eq!(lines, vec!["AKUA SERWAA", "BOATEMAA"]);
		for line in lines.iter() {
			assert!(text_width(line, name.font, BODY_SIZE) <= name.width - 2.0 * CELL_PADDING);
		}
	}

	#[test]
	fn text_wraps_between_words() {
		let program = &COLUMNS[4];
		assert_eq!(
			wrap_text(
				"Bachelor of Science in Computer Science",
				program.usable_width(),
				program.font,
				BODY_SIZE
			),
			vec!["Bachelor of Science in", "Computer Science"]
		);
		assert_eq!(wrap_text("short", 20.0, FontStyle::Regular, BODY_SIZE), vec!["short"]);
		assert_eq!(wrap_text("", 20.0, FontStyle::Regular, BODY_SIZE), vec![""]);
	}

	#[test]
	fn long_words_are_split() {
		let width = text_width("WWWW", FontStyle::Regular, BODY_SIZE) + 0.01;
		assert_eq!(
			wrap_text("WWWWWWWWWW", width, FontStyle::Regular, BODY_SIZE),
			vec!["WWWW", "WWWW", "WW"]
		);
		assert_eq!(
			wrap_text("to WWWWWWWW", width, FontStyle::Regular, BODY_SIZE),
			vec!["to", "WWWW", "WWWW"]
		);
	}

	#[test]
	fn every_cell_line_fits_its_column() {
		let wide = [
			String::from("AKUA SERWAA BOATEMAA OWUSU-ANSAH"),
			String::from("Female"),
			String::from("0244123456"),
			String::from("MAMPONG-AKUAPEM NURSING TRAINING COLLEGE"),
			String::from("BACHELOR OF SCIENCE IN MEDICAL LABORATORY SCIENCE"),
			String::from("COMMONWEALTH HALL"),
			String::from("CHOIR, USHERING, WELFARE, EVANGELISM"),
		];
		let pages = layout_pages(&[wide]);
		let row = &pages[0].rows[0];
		for (column, cell) in COLUMNS.iter().zip(row.lines.iter()) {
			for line in cell.iter() {
				assert!(
					text_width(line, column.font, BODY_SIZE) <= column.width - 2.0 * CELL_PADDING,
					"{:?} overflows {}",
					line,
					column.title
				);
			}
		}
		assert!(row.lines[0].len() > 1);
	}

	#[test]
	fn first_page_table_starts_below_summary() {
		let pages = layout_pages(&[row("Ama Mensah"), row("Yaw Boateng")]);
		assert_eq!(pages.len(), 1);
		assert_eq!(pages[0].table_top, TABLE_TOP);
		assert!(pages[0].rows[0].top > TABLE_TOP);
		assert!(!pages[0].rows[0].striped);
		assert!(pages[0].rows[1].striped);
	}

	#[test]
	fn rows_flow_onto_new_pages_without_splitting() {
		let rows: Vec<[String; 7]> = (0..120).map(|i| row(&format!("Member {}", i))).collect();
		let pages = layout_pages(&rows);
		assert!(pages.len() > 1);
		assert_eq!(pages.iter().map(|page| page.rows.len()).sum::<usize>(), 120);
		// Continuation pages keep the same top margin as the first.
		for page in pages.iter().skip(1) {
			assert_eq!(page.table_top, TABLE_TOP);
			assert!(page.rows[0].top > TABLE_TOP);
		}
		for row in pages.iter().flat_map(|page| page.rows.iter()) {
			assert!(row.top + row.height <= PAGE_HEIGHT - BOTTOM_MARGIN + 0.001);
		}
	}

	#[test]
	fn empty_list_still_has_a_page() {
		let pages = layout_pages(&[]);
		assert_eq!(pages.len(), 1);
		assert!(pages[0].rows.is_empty());
	}

	#[test]
	fn pdf_is_generated() {
		let students: Vec<StudentProfile> = (0..60)
			.map(|i| test_profile(i, "Ama", &format!("Mensah {}", i), Gender::Female))
			.collect();
		let bytes = members_pdf(&students, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()).unwrap();
		assert!(bytes.starts_with(b"%PDF"));
	}
}
