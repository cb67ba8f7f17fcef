use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::{EngineError, Result};

/// The level rotation: the ordered list of level names the game plays
/// through, as stored in `levels.xml`:
///
/// ```xml
/// <levels>
///     <level>level1</level>
///     <level>level2</level>
/// </levels>
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelList {
    levels: Vec<String>,
}

impl LevelList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            levels: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.levels
    }

    pub fn add(&mut self, name: impl Into<String>) {
        self.levels.push(name.into());
    }

    /// Removes the entry at `index`, returning it, or `None` if the
    /// index is past the end.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.levels.len() {
            Some(self.levels.remove(index))
        } else {
            None
        }
    }

    /// Swaps the entry at `index` with the one above it. Returns `false`
    /// when the entry is already first or the index is invalid.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.levels.len() {
            return false;
        }
        self.levels.swap(index - 1, index);
        true
    }

    /// Swaps the entry at `index` with the one below it. Returns `false`
    /// when the entry is already last or the index is invalid.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.levels.len() {
            return false;
        }
        self.levels.swap(index, index + 1);
        true
    }

    /// Serializes the rotation to an XML document.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the document fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("levels")))?;
        for name in &self.levels {
            writer.write_event(Event::Start(BytesStart::new("level")))?;
            writer.write_event(Event::Text(BytesText::new(name)))?;
            writer.write_event(Event::End(BytesEnd::new("level")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("levels")))?;
        Ok(writer.into_inner())
    }

    /// Parses a rotation document. Empty `<level>` elements are skipped
    /// with a warning, matching the game's reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed or the `<levels>` root
    /// is missing.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut seen_root = false;
        let mut in_level = false;
        let mut levels = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(element) => match element.name().as_ref() {
                    b"levels" => seen_root = true,
                    b"level" => in_level = true,
                    other => {
                        log::warn!("ignoring unknown element <{}> in level list", String::from_utf8_lossy(other));
                    }
                },
                Event::Text(text) => {
                    if in_level {
                        levels.push(std::str::from_utf8(&text)?.to_string());
                    }
                }
                Event::End(element) => {
                    if element.name().as_ref() == b"level" {
                        if !in_level {
                            return Err(EngineError::invalid_level_file("unbalanced </level> in level list"));
                        }
                        in_level = false;
                    }
                }
                Event::Empty(element) => {
                    if element.name().as_ref() == b"level" {
                        log::warn!("skipping empty <level/> entry in level list");
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !seen_root {
            return Err(EngineError::invalid_level_file("missing <levels> root element"));
        }
        Ok(Self { levels })
    }

    /// Loads the rotation from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Saves the rotation, encoding the whole document before touching
    /// the file.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trip_preserves_order() {
        let list = LevelList::from_names(["level1", "level2", "boss"]);
        let bytes = list.to_bytes().unwrap();
        let loaded = LevelList::from_bytes(&bytes).unwrap();
        assert_eq!(list, loaded);
    }

    #[test]
    fn reordering() {
        let mut list = LevelList::from_names(["a", "b", "c"]);

        assert!(list.move_up(2));
        assert_eq!(&["a".to_string(), "c".to_string(), "b".to_string()], list.names());

        assert!(list.move_down(0));
        assert_eq!(&["c".to_string(), "a".to_string(), "b".to_string()], list.names());

        assert!(!list.move_up(0));
        assert!(!list.move_down(2));
        assert!(!list.move_up(17));
    }

    #[test]
    fn add_and_remove() {
        let mut list = LevelList::new();
        list.add("level1");
        list.add("level2");
        assert_eq!(Some("level1".to_string()), list.remove(0));
        assert_eq!(None, list.remove(5));
        assert_eq!(&["level2".to_string()], list.names());
    }

    #[test]
    fn missing_root_fails() {
        assert!(matches!(
            LevelList::from_bytes(b"<rotation></rotation>"),
            Err(EngineError::InvalidLevelFile { .. })
        ));
    }
}
