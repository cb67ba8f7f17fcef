use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::{BrickCatalog, EngineError, Result, TileGrid};

use super::{LevelFormat, LoadData};

/// The XML level format used by the game itself:
///
/// ```xml
/// <level width="25" height="23">
///     <brick name="redBrick">
///         <position x="3" y="3" />
///     </brick>
/// </level>
/// ```
///
/// Empty cells are never written; a brick with no occurrences gets no
/// element at all. On load, duplicate positions are not an error: the
/// last one written wins, as in the game's reader.
#[derive(Default)]
pub struct XmlLevel {}

impl LevelFormat for XmlLevel {
    fn file_extension(&self) -> &str {
        "xml"
    }

    fn name(&self) -> &str {
        "Xml"
    }

    fn to_bytes(&self, grid: &TileGrid, catalog: &BrickCatalog) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut level = BytesStart::new("level");
        level.push_attribute(("width", grid.width().to_string().as_str()));
        level.push_attribute(("height", grid.height().to_string().as_str()));
        writer.write_event(Event::Start(level))?;

        for (index, brick) in catalog.iter() {
            let positions = grid.positions_of(index);
            if positions.is_empty() {
                continue;
            }

            let mut brick_element = BytesStart::new("brick");
            brick_element.push_attribute(("name", brick.name.as_str()));
            writer.write_event(Event::Start(brick_element))?;

            for pos in positions {
                let mut position_element = BytesStart::new("position");
                position_element.push_attribute(("x", pos.x.to_string().as_str()));
                position_element.push_attribute(("y", pos.y.to_string().as_str()));
                writer.write_event(Event::Empty(position_element))?;
            }

            writer.write_event(Event::End(BytesEnd::new("brick")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("level")))?;
        Ok(writer.into_inner())
    }

    fn load_grid(&self, data: &[u8], catalog: &BrickCatalog, _load_data: Option<LoadData>) -> Result<TileGrid> {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut grid: Option<TileGrid> = None;
        let mut current_brick: Option<i32> = None;

        loop {
            let event = reader.read_event_into(&mut buf)?;
            let self_closing = matches!(event, Event::Empty(_));
            match event {
                Event::Start(element) | Event::Empty(element) => match element.name().as_ref() {
                    b"level" => {
                        let width = int_attribute(&element, "level", "width")?;
                        let height = int_attribute(&element, "level", "height")?;
                        grid = Some(TileGrid::new((width, height))?);
                    }
                    b"brick" => {
                        let name = string_attribute(&element, "brick", "name")?;
                        let Some((index, _)) = catalog.brick_by_name(&name) else {
                            return Err(EngineError::unknown_brick(name));
                        };
                        // A self-closing <brick/> gets no End event, so its
                        // index must not stay in effect past this element.
                        current_brick = if self_closing { None } else { Some(index) };
                    }
                    b"position" => {
                        let Some(grid) = grid.as_mut() else {
                            return Err(EngineError::invalid_level_file("<position> outside of a <level> element"));
                        };
                        let Some(index) = current_brick else {
                            return Err(EngineError::invalid_level_file("<position> outside of a <brick> element"));
                        };
                        let x = int_attribute(&element, "position", "x")?;
                        let y = int_attribute(&element, "position", "y")?;
                        grid.set((x, y), index)?;
                    }
                    other => {
                        log::warn!("ignoring unknown element <{}> in level file", String::from_utf8_lossy(other));
                    }
                },
                Event::End(element) => {
                    if element.name().as_ref() == b"brick" {
                        current_brick = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        grid.ok_or_else(|| EngineError::invalid_level_file("missing <level> root element"))
    }
}

fn string_attribute(element: &BytesStart<'_>, element_name: &str, attribute: &str) -> Result<String> {
    for attr in element.attributes() {
        let attr = attr.map_err(|_| EngineError::malformed_attribute(element_name, attribute))?;
        if attr.key.as_ref() == attribute.as_bytes() {
            return Ok(std::str::from_utf8(&attr.value)?.to_string());
        }
    }
    Err(EngineError::malformed_attribute(element_name, attribute))
}

fn int_attribute(element: &BytesStart<'_>, element_name: &str, attribute: &str) -> Result<i32> {
    string_attribute(element, element_name, attribute)?
        .parse()
        .map_err(|_| EngineError::malformed_attribute(element_name, attribute))
}
