//! # PDF Report
//!
//! Mirrors what the user saw: the criteria table with ranks, then every comparison as a sentence.
//!
//! ## Layout
//! - A4 portrait, millimetres, measured from the top-left like a screen
//! - [`layout`] is pure and decides every mark and page break
//! - [`render`] only flips the y axis and hands the marks to `printpdf`
//!
//! ## Page Breaks
//! Comparison rows step down 15mm. Once the next row would start past 270mm a fresh page is
//! opened at 20mm. The footer goes on whichever page is last.
use std::collections::HashMap;

use criteria::{CATALOGUE, Comparison, RankedCriterion};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
    Rgb as PdfRgb, path::PaintMode,
};
use thiserror::Error;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

pub const TITLE: &str = "Laptop Selection Criteria Weighing";

const MARGIN: f32 = 20.0;
const ROW_STEP: f32 = 15.0;
const PAGE_BOTTOM: f32 = 270.0;
const FOOTER_Y: f32 = 280.0;

// Average Helvetica advance as a share of the font size, only used to centre the title.
const HELVETICA_ADVANCE: f32 = 0.5;
const PT_TO_MM: f32 = 0.352_778;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

const BLACK: Rgb = Rgb(0, 0, 0);
const NAVY: Rgb = Rgb(30, 50, 100);
const GREY: Rgb = Rgb(80, 80, 80);
const FADED: Rgb = Rgb(150, 150, 150);
const GREEN: Rgb = Rgb(30, 100, 30);
const BLUE: Rgb = Rgb(0, 0, 150);
const STRIPE: Rgb = Rgb(245, 245, 245);
const FOOTER: Rgb = Rgb(100, 100, 100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Rgb,
        align: Align,
    },
    Band {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
    },
}

impl Mark {
    pub fn text(&self) -> Option<&str> {
        match self {
            Mark::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub marks: Vec<Mark>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.marks.iter().filter_map(Mark::text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub pages: Vec<Page>,
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to render PDF: {0}")]
    Render(String),
}

struct Pager {
    done: Vec<Page>,
    current: Page,
}

impl Pager {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            current: Page::default(),
        }
    }

    fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Rgb) {
        self.current.marks.push(Mark::Text {
            text: text.into(),
            x,
            y,
            size,
            color,
            align: Align::Left,
        });
    }

    fn stripe(&mut self, y: f32) {
        self.current.marks.push(Mark::Band {
            x: MARGIN,
            y: y - 7.0,
            width: 170.0,
            height: 12.0,
            color: STRIPE,
        });
    }

    fn push(&mut self, mark: Mark) {
        self.current.marks.push(mark);
    }

    fn break_page(&mut self) {
        let full = std::mem::take(&mut self.current);
        self.done.push(full);
    }

    fn finish(mut self) -> Report {
        self.done.push(self.current);
        Report { pages: self.done }
    }
}

/// Lays the report out. `ranked` order decides the printed rank, position 1 first.
pub fn layout(
    ranked: &[RankedCriterion],
    comparisons: &[Comparison],
    submission_id: &str,
    generated_at: &str,
) -> Report {
    let mut pager = Pager::new();

    pager.push(Mark::Text {
        text: TITLE.to_string(),
        x: PAGE_WIDTH / 2.0,
        y: 20.0,
        size: 22.0,
        color: NAVY,
        align: Align::Center,
    });
    pager.push(Mark::Rule {
        x1: MARGIN,
        x2: 190.0,
        y: 25.0,
        thickness: 0.5,
    });

    pager.text("Step 1: Rank Criteria by Importance", MARGIN, 40.0, 18.0, BLACK);
    pager.text(
        "(Ranked from most important to least important)",
        MARGIN,
        47.0,
        12.0,
        GREY,
    );

    let positions: HashMap<&str, usize> = ranked
        .iter()
        .enumerate()
        .map(|(i, criterion)| (criterion.id.as_str(), i + 1))
        .collect();

    let mut y = 60.0;
    for (index, (id, name)) in CATALOGUE.iter().enumerate() {
        if index % 2 == 0 {
            pager.stripe(y);
        }

        pager.text(format!("{id}: {name}"), 25.0, y, 14.0, BLACK);

        match positions.get(id) {
            Some(position) => pager.text(format!("Rank: {position}"), 160.0, y, 14.0, GREEN),
            None => pager.text("Not ranked", 160.0, y, 14.0, FADED),
        }

        y += ROW_STEP;
    }

    y += ROW_STEP;
    pager.text("Step 2: Compare Adjacent Criteria", MARGIN, y, 18.0, BLACK);
    pager.text(
        "(How much more important each criterion is than the previous)",
        MARGIN,
        y + 7.0,
        12.0,
        GREY,
    );
    y += 20.0;

    if comparisons.is_empty() {
        pager.text("No comparisons made", 25.0, y, 14.0, FADED);
    }

    for (index, comparison) in comparisons.iter().enumerate() {
        if index % 2 == 0 {
            pager.stripe(y);
        }

        pager.text(comparison.criterion2.name.as_str(), 25.0, y, 14.0, BLACK);
        pager.text("is", 70.0, y, 14.0, GREY);
        pager.text(comparison.importance.to_string(), 80.0, y, 14.0, BLUE);
        pager.text("times more important than", 90.0, y, 14.0, GREY);
        pager.text(comparison.criterion1.name.as_str(), 155.0, y, 14.0, BLACK);

        y += ROW_STEP;
        if y > PAGE_BOTTOM {
            pager.break_page();
            y = MARGIN;
        }
    }

    pager.text(
        format!("Generated on: {generated_at}"),
        MARGIN,
        FOOTER_Y,
        10.0,
        FOOTER,
    );
    pager.text(
        format!("Submission ID: {submission_id}"),
        MARGIN,
        FOOTER_Y + 5.0,
        10.0,
        FOOTER,
    );

    pager.finish()
}

fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(PdfRgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn draw(layer: &PdfLayerReference, font: &IndirectFontRef, mark: &Mark) {
    match mark {
        Mark::Text {
            text,
            x,
            y,
            size,
            color: rgb,
            align,
        } => {
            let x = match align {
                Align::Left => *x,
                Align::Center => {
                    let width = text.chars().count() as f32 * size * HELVETICA_ADVANCE * PT_TO_MM;
                    x - width / 2.0
                }
            };

            layer.set_fill_color(color(*rgb));
            layer.use_text(text.as_str(), *size, Mm(x), Mm(PAGE_HEIGHT - y), font);
        }
        Mark::Band {
            x,
            y,
            width,
            height,
            color: rgb,
        } => {
            layer.set_fill_color(color(*rgb));
            layer.add_rect(
                Rect::new(
                    Mm(*x),
                    Mm(PAGE_HEIGHT - (y + height)),
                    Mm(x + width),
                    Mm(PAGE_HEIGHT - y),
                )
                .with_mode(PaintMode::Fill),
            );
        }
        Mark::Rule {
            x1,
            x2,
            y,
            thickness,
        } => {
            layer.set_outline_color(color(BLACK));
            layer.set_outline_thickness(*thickness);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), Mm(PAGE_HEIGHT - y)), false),
                    (Point::new(Mm(*x2), Mm(PAGE_HEIGHT - y)), false),
                ],
                is_closed: false,
            });
        }
    }
}

pub fn render(report: &Report) -> Result<Vec<u8>, ReportError> {
    let (document, first_page, first_layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Render(e.to_string()))?;

    for (index, page) in report.pages.iter().enumerate() {
        let layer = if index == 0 {
            document.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                document.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            document.get_page(page_index).get_layer(layer_index)
        };

        for mark in &page.marks {
            draw(&layer, &font, mark);
        }
    }

    document
        .save_to_bytes()
        .map_err(|e| ReportError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use criteria::{Importance, model::adjacent_comparisons};

    use super::*;

    fn ranked(order: &[&str]) -> Vec<RankedCriterion> {
        order
            .iter()
            .enumerate()
            .map(|(i, id)| RankedCriterion {
                id: id.to_string(),
                name: criteria::model::catalogue_name(id).unwrap().to_string(),
                rank: i as u8 + 1,
            })
            .collect()
    }

    fn comparison_rows(page: &Page) -> usize {
        page.texts()
            .filter(|text| *text == "times more important than")
            .count()
    }

    #[test]
    fn test_single_page_report() {
        let order = ranked(&["C-2", "C-1", "C-3", "C-5", "C-4"]);
        let mut comparisons = adjacent_comparisons(&order);
        comparisons[2].importance = Importance::try_from(5).unwrap();

        let report = layout(&order, &comparisons, "42", "3/1/2025, 12:00:00 PM");

        assert_eq!(report.pages.len(), 1);
        let texts: Vec<&str> = report.pages[0].texts().collect();

        assert_eq!(texts[0], TITLE);
        assert!(texts.contains(&"C-1: Performance"));
        assert_eq!(
            texts
                .iter()
                .filter(|text| text.starts_with("Rank: "))
                .count(),
            5
        );

        let c1 = texts.iter().position(|t| *t == "C-1: Performance").unwrap();
        assert_eq!(texts[c1 + 1], "Rank: 2");
        let c4 = texts.iter().position(|t| *t == "C-4: Portability").unwrap();
        assert_eq!(texts[c4 + 1], "Rank: 5");

        assert_eq!(comparison_rows(&report.pages[0]), 4);
        assert!(texts.contains(&"5"));
        assert!(texts.contains(&"Submission ID: 42"));
        assert!(texts.contains(&"Generated on: 3/1/2025, 12:00:00 PM"));
    }

    #[test]
    fn test_missing_criteria_are_not_ranked() {
        let order = ranked(&["C-5", "C-1"]);
        let report = layout(&order, &[], "7", "now");
        let texts: Vec<&str> = report.pages[0].texts().collect();

        assert_eq!(
            texts.iter().filter(|text| **text == "Not ranked").count(),
            3
        );
        assert!(texts.contains(&"No comparisons made"));
    }

    #[test]
    fn test_comparisons_paginate() {
        let order = ranked(&["C-1", "C-2", "C-3", "C-4", "C-5"]);
        let comparisons: Vec<Comparison> = adjacent_comparisons(&order)
            .into_iter()
            .cycle()
            .take(10)
            .collect();

        let report = layout(&order, &comparisons, "9", "now");

        assert_eq!(report.pages.len(), 2);
        assert_eq!(comparison_rows(&report.pages[0]), 7);
        assert_eq!(comparison_rows(&report.pages[1]), 3);
        assert!(report.pages[1].texts().any(|t| t == "Submission ID: 9"));
        assert!(!report.pages[0].texts().any(|t| t.starts_with("Submission ID")));

        let first_row_y = report.pages[1].marks.iter().find_map(|mark| match mark {
            Mark::Text { text, y, .. } if text == "is" => Some(*y),
            _ => None,
        });
        assert_eq!(first_row_y, Some(MARGIN));
    }

    #[test]
    fn test_rows_are_striped_alternately() {
        let order = ranked(&["C-1", "C-2", "C-3", "C-4", "C-5"]);
        let report = layout(&order, &adjacent_comparisons(&order), "1", "now");

        let bands = report.pages[0]
            .marks
            .iter()
            .filter(|mark| matches!(mark, Mark::Band { .. }))
            .count();

        // criteria rows 0, 2, 4 and comparison rows 0, 2
        assert_eq!(bands, 5);
    }

    #[test]
    fn test_render_produces_pdf() {
        let order = ranked(&["C-1", "C-2", "C-3", "C-4", "C-5"]);
        let report = layout(&order, &adjacent_comparisons(&order), "1", "now");

        let bytes = render(&report).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }
}
