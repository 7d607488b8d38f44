//! Parsing of the tag-based catalog source document
//!
//! The document declares color palettes and sets of parts:
//!
//! ```text
//! <palette id="3">
//!   <color id="61" index="61" club="0" selectable="1">FFFFFF</color>
//! </palette>
//! <settype type="ch" paletteid="3">
//!   <set id="3001" gender="U" club="0" colorable="1" selectable="1" sellable="0">
//!     <part id="3001" type="ch" colorable="1" index="0" colorindex="1"/>
//!   </set>
//! </settype>
//! ```
//!
//! Parsing is lenient. Missing attributes take their least-privileged value
//! and every structurally incomplete palette, color, set or part is skipped
//! on its own, counted, and reported as a warning.

use std::collections::BTreeSet;

use crate::markup::{scan, Tag, Token};
use crate::models::{ClubTier, Color, Gender, Palette, PartDefinition, SetDefinition, Warning};

/// Result of parsing a source document.
#[derive(Debug, Clone, Default)]
pub struct ParsedFigureData {
    pub palettes: Vec<Palette>,
    pub sets: Vec<SetDefinition>,
    /// Number of entries dropped as malformed
    pub skipped: usize,
    pub warnings: Vec<Warning>,
}

impl ParsedFigureData {
    /// True when the document yielded no palettes and no sets at all.
    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty() && self.sets.is_empty()
    }

    fn skip(&mut self, message: String) {
        self.skipped += 1;
        self.warnings.push(Warning::new(message));
    }
}

struct OpenSet {
    set: SetDefinition,
    colorable: Option<bool>,
}

/// Parser state while walking the token stream.
#[derive(Default)]
struct State {
    out: ParsedFigureData,
    palette: Option<Palette>,
    /// Inside a palette that was rejected; its colors are ignored
    skipping_palette: bool,
    /// A `<color>` element waiting for its text and closing tag
    color: Option<Color>,
    settype: Option<String>,
    set: Option<OpenSet>,
}

/// Parse a catalog source document.
pub fn parse_figuredata(input: &str) -> ParsedFigureData {
    let (tokens, scan_warnings) = scan(input);
    let mut state = State::default();
    state.out.warnings.extend(scan_warnings);

    for token in tokens {
        match token {
            Token::Open(tag) => state.open(tag),
            Token::Close(name) => state.close(&name),
            Token::Text(text) => {
                if let Some(color) = state.color.as_mut() {
                    color.hex = Some(text);
                }
            }
        }
    }

    state.finish()
}

impl State {
    fn open(&mut self, tag: Tag) {
        match tag.name.as_str() {
            "palette" => self.open_palette(&tag),
            "color" => self.open_color(&tag),
            "settype" => self.settype = tag.attr("type").map(str::to_string),
            "set" => self.open_set(&tag),
            "part" => self.open_part(&tag),
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "palette" => self.close_palette(),
            "color" => self.close_color(),
            "settype" => self.settype = None,
            "set" => self.close_set(),
            _ => {}
        }
    }

    fn open_palette(&mut self, tag: &Tag) {
        if self.palette.is_some() {
            self.close_palette();
        }
        self.skipping_palette = false;
        match non_empty(tag.attr("id")) {
            Some(id) => {
                self.palette = Some(Palette::new(id));
                if tag.self_closing {
                    self.close_palette();
                }
            }
            None => {
                self.out.skip("Skipping palette without id".to_string());
                self.skipping_palette = !tag.self_closing;
            }
        }
    }

    fn open_color(&mut self, tag: &Tag) {
        if self.palette.is_none() {
            if !self.skipping_palette {
                self.out.skip("Skipping color outside of a palette".to_string());
            }
            return;
        }
        self.close_color();

        let Some(id) = non_empty(tag.attr("id")) else {
            let message = format!("Skipping color without id in palette '{}'", self.palette_id());
            self.out.skip(message);
            return;
        };
        let color = Color {
            id: id.to_string(),
            index: parse_index(tag.attr("index")),
            club_restricted: ClubTier::from_attr(tag.attr("club").unwrap_or("")) == ClubTier::Premium,
            selectable: tag.flag("selectable"),
            hex: None,
        };
        self.color = Some(color);
        if tag.self_closing {
            self.close_color();
        }
    }

    fn close_color(&mut self) {
        let Some(color) = self.color.take() else {
            return;
        };
        let Some(palette) = self.palette.as_mut() else {
            return;
        };
        let id = color.id.clone();
        if !palette.push(color) {
            let message = format!("Skipping duplicate color '{}' in palette '{}'", id, palette.id);
            self.out.skip(message);
        }
    }

    fn close_palette(&mut self) {
        self.close_color();
        if let Some(palette) = self.palette.take() {
            self.out.palettes.push(palette);
        }
        self.skipping_palette = false;
    }

    fn palette_id(&self) -> &str {
        self.palette.as_ref().map_or("", |p| p.id.as_str())
    }

    fn open_set(&mut self, tag: &Tag) {
        if let Some(open) = self.set.take() {
            self.finish_set(open);
        }
        let set = SetDefinition {
            id: non_empty(tag.attr("id")).map(str::to_string),
            settype: self.settype.clone(),
            gender: Gender::from_attr(tag.attr("gender").unwrap_or("")),
            club: ClubTier::from_attr(tag.attr("club").unwrap_or("")),
            sellable: tag.flag("sellable"),
            selectable: tag.flag("selectable"),
            parts: Vec::new(),
        };
        let open = OpenSet { set, colorable: tag.opt_flag("colorable") };
        if tag.self_closing {
            self.finish_set(open);
        } else {
            self.set = Some(open);
        }
    }

    fn open_part(&mut self, tag: &Tag) {
        let Some(open) = self.set.as_mut() else {
            self.out.skip("Skipping part outside of a set".to_string());
            return;
        };
        let (Some(id), Some(category)) = (non_empty(tag.attr("id")), non_empty(tag.attr("type")))
        else {
            let set_id = open.set.id.clone().unwrap_or_default();
            self.out.skip(format!("Skipping part without id or type in set '{}'", set_id));
            return;
        };

        let color_index_tags: BTreeSet<String> = tag
            .attr("colorindex")
            .unwrap_or("")
            .split([',', ' '])
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        open.set.parts.push(PartDefinition {
            category: category.to_string(),
            part_id: id.to_string(),
            colorable: tag.opt_flag("colorable").or(open.colorable).unwrap_or(false),
            index: parse_index(tag.attr("index")),
            color_index_tags,
        });
    }

    fn close_set(&mut self) {
        if let Some(open) = self.set.take() {
            self.finish_set(open);
        }
    }

    fn finish_set(&mut self, open: OpenSet) {
        if open.set.parts.is_empty() {
            let id = open.set.id.unwrap_or_default();
            self.out.skip(format!("Skipping set '{}' without parts", id));
            return;
        }
        self.out.sets.push(open.set);
    }

    fn finish(mut self) -> ParsedFigureData {
        if let Some(palette) = self.palette.take() {
            self.color = None;
            self.out.skip(format!("Skipping unterminated palette '{}'", palette.id));
        }
        if let Some(open) = self.set.take() {
            let id = open.set.id.unwrap_or_default();
            self.out.skip(format!("Skipping unterminated set '{}'", id));
        }
        self.out
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_index(value: Option<&str>) -> u32 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}
