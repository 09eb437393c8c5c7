use super::ShaderError;

pub const VERTEX_MARKER: &str = "#VERTEX_SHADER";
pub const FRAGMENT_MARKER: &str = "#FRAGMENT_SHADER";

/// The two stage sections of a shader file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

/// Byte span of a marker line: `start` is the first byte of the marker,
/// `end` is one past its line terminator (or end of text).
#[derive(Debug, Copy, Clone)]
struct LineSpan {
    start: usize,
    end: usize,
}

impl ShaderSource {
    /// Splits `text` at its marker lines.
    ///
    /// A marker must be alone on its line; a trailing `\r` is tolerated.
    /// The first matching line wins for each marker.
    pub fn parse(text: &str) -> Result<Self, ShaderError> {
        let vertex = find_line(text, VERTEX_MARKER).ok_or_else(|| {
            ShaderError::MalformedShaderSource(format!("missing `{VERTEX_MARKER}` line"))
        })?;
        let fragment = find_line(text, FRAGMENT_MARKER).ok_or_else(|| {
            ShaderError::MalformedShaderSource(format!("missing `{FRAGMENT_MARKER}` line"))
        })?;

        if fragment.start < vertex.end {
            return Err(ShaderError::MalformedShaderSource(format!(
                "`{FRAGMENT_MARKER}` must come after `{VERTEX_MARKER}`"
            )));
        }

        Ok(Self {
            vertex: text[vertex.end..fragment.start].to_owned(),
            fragment: text[fragment.end..].to_owned(),
        })
    }

    /// Re-wraps both sections with their marker lines.
    pub fn to_source_text(&self) -> String {
        format!(
            "{VERTEX_MARKER}\n{}{FRAGMENT_MARKER}\n{}",
            self.vertex, self.fragment
        )
    }
}

fn find_line(text: &str, marker: &str) -> Option<LineSpan> {
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        let end = start + line.len();
        let content = line.strip_suffix('\n').unwrap_or(line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        if content == marker {
            return Some(LineSpan { start, end });
        }
        start = end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "#VERTEX_SHADER\nfn vs() {}\nlet a = 1;\n#FRAGMENT_SHADER\nfn fs() {}\n";

    fn malformed(text: &str) -> bool {
        matches!(ShaderSource::parse(text), Err(ShaderError::MalformedShaderSource(_)))
    }

    #[test]
    fn splits_sections_between_markers() {
        let src = ShaderSource::parse(WELL_FORMED).unwrap();
        assert_eq!(src.vertex, "fn vs() {}\nlet a = 1;\n");
        assert_eq!(src.fragment, "fn fs() {}\n");
    }

    #[test]
    fn round_trip_reproduces_file() {
        let src = ShaderSource::parse(WELL_FORMED).unwrap();
        assert_eq!(src.to_source_text(), WELL_FORMED);
        assert_eq!(ShaderSource::parse(&src.to_source_text()).unwrap(), src);
    }

    #[test]
    fn sections_non_empty_when_source_is() {
        let src = ShaderSource::parse("#VERTEX_SHADER\nv\n#FRAGMENT_SHADER\nf").unwrap();
        assert!(!src.vertex.is_empty());
        assert!(!src.fragment.is_empty());
    }

    #[test]
    fn adjacent_markers_give_empty_sections() {
        let src = ShaderSource::parse("#VERTEX_SHADER\n#FRAGMENT_SHADER\n").unwrap();
        assert_eq!(src, ShaderSource::default());
    }

    #[test]
    fn text_before_vertex_marker_is_ignored() {
        let src = ShaderSource::parse("// header\n#VERTEX_SHADER\nv\n#FRAGMENT_SHADER\nf\n").unwrap();
        assert_eq!(src.vertex, "v\n");
    }

    #[test]
    fn crlf_line_endings() {
        let src = ShaderSource::parse("#VERTEX_SHADER\r\nv\r\n#FRAGMENT_SHADER\r\nf\r\n").unwrap();
        assert_eq!(src.vertex, "v\r\n");
        assert_eq!(src.fragment, "f\r\n");
    }

    #[test]
    fn fragment_marker_at_very_end() {
        let src = ShaderSource::parse("#VERTEX_SHADER\nv\n#FRAGMENT_SHADER").unwrap();
        assert_eq!(src.vertex, "v\n");
        assert!(src.fragment.is_empty());
    }

    #[test]
    fn missing_markers() {
        assert!(malformed(""));
        assert!(malformed("#VERTEX_SHADER\nv\n"));
        assert!(malformed("v\n#FRAGMENT_SHADER\nf\n"));
        assert!(malformed("no markers at all"));
    }

    #[test]
    fn markers_must_match_whole_line() {
        assert!(malformed("#VERTEX_SHADER\nv\n  #FRAGMENT_SHADER\nf\n"));
        assert!(malformed("#VERTEX_SHADER\nv\n#FRAGMENT_SHADER_V2\nf\n"));
        assert!(malformed("#VERTEX_SHADER\nv // #FRAGMENT_SHADER\n"));
    }

    #[test]
    fn reversed_markers() {
        assert!(malformed("#FRAGMENT_SHADER\nf\n#VERTEX_SHADER\nv\n"));
    }

    #[test]
    fn every_truncation_is_handled() {
        let fragment_complete = WELL_FORMED.find(FRAGMENT_MARKER).unwrap() + FRAGMENT_MARKER.len();
        for cut in 0..=WELL_FORMED.len() {
            let result = ShaderSource::parse(&WELL_FORMED[..cut]);
            assert_eq!(result.is_ok(), cut >= fragment_complete, "cut at {cut}");
        }
    }

    #[test]
    fn fragment_marker_moved_through_every_line() {
        // Move the fragment marker line to each line position of a vertex-only body.
        let lines = ["#VERTEX_SHADER", "a", "b", "c"];
        for at in 0..=lines.len() {
            let mut l: Vec<&str> = lines.to_vec();
            l.insert(at, FRAGMENT_MARKER);
            let text = l.join("\n");
            let result = ShaderSource::parse(&text);
            // Position 0 puts it before the vertex marker.
            assert_eq!(result.is_ok(), at > 0, "marker at line {at}");
        }
    }
}
