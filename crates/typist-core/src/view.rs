//! View state owned by the controller: the append-only output region, the
//! single-line input control, and the loading/ready phase.

/// Lifecycle of the view. The only transition is `Loading -> Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Ready,
}

/// What wrote a logical line, so front ends can style it without guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineKind {
    /// Revealed resource text.
    #[default]
    Text,
    Echo,
    Reply,
    Error,
}

/// Append-only text region.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    text: String,
    /// One entry per logical line of `text`, including the open last line.
    kinds: Vec<LineKind>,
    /// Revision number for dirty tracking
    revision: u64,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self {
            text: String::new(),
            kinds: vec![LineKind::Text],
            revision: 0,
        }
    }
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.push_kind(text, LineKind::Text);
        self.revision += 1;
    }

    /// Append `line` on a line of its own.
    pub fn append_line(&mut self, line: &str) {
        self.append_line_as(line, LineKind::Text);
    }

    /// Append `line` on a line of its own, tagging every line it spans with `kind`.
    pub fn append_line_as(&mut self, line: &str, kind: LineKind) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.push_kind("\n", kind);
        }
        self.push_kind(line, kind);
        if !line.ends_with('\n') {
            self.push_kind("\n", kind);
        }
        self.revision += 1;
    }

    fn push_kind(&mut self, text: &str, kind: LineKind) {
        // An empty open line takes the kind of whatever starts it.
        if self.text.is_empty() || self.text.ends_with('\n') {
            if let Some(last) = self.kinds.last_mut() {
                *last = kind;
            }
        }
        self.text.push_str(text);
        self.kinds
            .extend(std::iter::repeat_n(kind, text.matches('\n').count()));
    }

    /// Logical lines (split on `\n`, keeping the open last line) with their kinds.
    pub fn tagged_lines(&self) -> impl Iterator<Item = (LineKind, &str)> + '_ {
        self.kinds.iter().copied().zip(self.text.split('\n'))
    }

    /// [`Self::tagged_lines`] from the newest line back.
    pub fn tagged_lines_rev(&self) -> impl Iterator<Item = (LineKind, &str)> + '_ {
        self.kinds.iter().rev().copied().zip(self.text.rsplit('\n'))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.text.lines()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Single-line text input with a char-indexed caret.
#[derive(Debug, Clone, Default)]
pub struct InputLine {
    value: String,
    caret: usize,
    enabled: bool,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Caret position in chars.
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.enabled || c == '\n' || c == '\r' {
            return;
        }
        let at = self.byte_index(self.caret);
        self.value.insert(at, c);
        self.caret += 1;
    }

    /// Insert pasted text. Line breaks are folded into spaces.
    pub fn insert_str(&mut self, text: &str) {
        if !self.enabled {
            return;
        }
        let folded = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
        let at = self.byte_index(self.caret);
        self.value.insert_str(at, &folded);
        self.caret += folded.chars().count();
    }

    pub fn backspace(&mut self) {
        if !self.enabled || self.caret == 0 {
            return;
        }
        self.caret -= 1;
        let at = self.byte_index(self.caret);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if !self.enabled || self.caret >= self.char_len() {
            return;
        }
        let at = self.byte_index(self.caret);
        self.value.remove(at);
    }

    pub fn move_left(&mut self) {
        if self.enabled {
            self.caret = self.caret.saturating_sub(1);
        }
    }

    pub fn move_right(&mut self) {
        if self.enabled {
            self.caret = (self.caret + 1).min(self.char_len());
        }
    }

    pub fn move_home(&mut self) {
        if self.enabled {
            self.caret = 0;
        }
    }

    pub fn move_end(&mut self) {
        if self.enabled {
            self.caret = self.char_len();
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.caret = 0;
    }

    /// Text before the caret, used to place the terminal cursor.
    pub fn before_caret(&self) -> &str {
        &self.value[..self.byte_index(self.caret)]
    }
}

/// The explicit view handle handed to the controller.
#[derive(Debug, Clone, Default)]
pub struct TerminalView {
    pub output: OutputBuffer,
    pub input: InputLine,
    phase: Phase,
    focused: bool,
    cursor_visible: bool,
    /// Bumped on changes that do not touch the output buffer
    state_revision: u64,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        if self.cursor_visible != visible {
            self.cursor_visible = visible;
            self.state_revision += 1;
        }
    }

    pub fn toggle_cursor(&mut self) {
        self.set_cursor_visible(!self.cursor_visible);
    }

    /// Enable and focus the input. Returns false when already ready.
    pub fn mark_ready(&mut self) -> bool {
        if self.phase == Phase::Ready {
            return false;
        }
        self.phase = Phase::Ready;
        self.input.set_enabled(true);
        self.focused = true;
        self.state_revision += 1;
        true
    }

    /// Combined revision of output and view state, for redraw decisions.
    pub fn revision(&self) -> u64 {
        self.output.revision() + self.state_revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_line_separates_from_partial_line() {
        let mut out = OutputBuffer::new();
        out.append("booting");
        out.append_line("> hi");
        assert_eq!(out.as_str(), "booting\n> hi\n");
    }

    #[test]
    fn append_line_on_empty_buffer_has_no_leading_newline() {
        let mut out = OutputBuffer::new();
        out.append_line("first");
        out.append_line("second\n");
        assert_eq!(out.as_str(), "first\nsecond\n");
    }

    #[test]
    fn line_kinds_follow_the_writer_not_the_text() {
        let mut out = OutputBuffer::new();
        out.append("> not an echo\nstill pa");
        out.append("ge");
        out.append_line_as("> hi", LineKind::Echo);
        out.append_line_as("< first\nsecond", LineKind::Reply);
        out.append_line_as("[error] nope", LineKind::Error);

        let tagged: Vec<_> = out.tagged_lines().collect();
        assert_eq!(
            tagged,
            vec![
                (LineKind::Text, "> not an echo"),
                (LineKind::Text, "still page"),
                (LineKind::Echo, "> hi"),
                (LineKind::Reply, "< first"),
                (LineKind::Reply, "second"),
                (LineKind::Error, "[error] nope"),
                (LineKind::Error, ""),
            ]
        );

        let newest: Vec<_> = out.tagged_lines_rev().take(2).collect();
        assert_eq!(
            newest,
            vec![(LineKind::Error, ""), (LineKind::Error, "[error] nope")]
        );
    }

    #[test]
    fn output_revision_tracks_mutations() {
        let mut out = OutputBuffer::new();
        out.append("");
        assert_eq!(out.revision(), 0);
        out.append("a");
        out.append_line("b");
        assert_eq!(out.revision(), 2);
    }

    #[test]
    fn disabled_input_ignores_edits() {
        let mut input = InputLine::new();
        input.insert_char('x');
        input.insert_str("pasted");
        assert_eq!(input.value(), "");
    }

    #[test]
    fn caret_editing_handles_multibyte_chars() {
        let mut input = InputLine::new();
        input.set_enabled(true);
        input.insert_str("héllo");
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.value(), "hélo");
        assert_eq!(input.before_caret(), "hé");
        input.move_home();
        input.delete();
        assert_eq!(input.value(), "élo");
        input.move_end();
        input.insert_char('!');
        assert_eq!(input.value(), "élo!");
    }

    #[test]
    fn paste_folds_newlines() {
        let mut input = InputLine::new();
        input.set_enabled(true);
        input.insert_str("one\r\ntwo\nthree");
        assert_eq!(input.value(), "one two three");
        assert_eq!(input.caret(), 13);
    }

    #[test]
    fn mark_ready_happens_once() {
        let mut view = TerminalView::new();
        assert_eq!(view.phase(), Phase::Loading);
        assert!(!view.input.is_enabled());

        assert!(view.mark_ready());
        assert_eq!(view.phase(), Phase::Ready);
        assert!(view.input.is_enabled());
        assert!(view.is_focused());

        assert!(!view.mark_ready());
    }
}
