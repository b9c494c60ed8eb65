//! Call stack tracing for runtime error reporting.

use super::Span;
use std::fmt;

/// Represents a single frame in the call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    /// Function or procedure name
    pub function_name: String,
    /// Source location where the call was made
    pub call_site: Option<Span>,
    /// Source location of the function definition
    pub definition_site: Option<Span>,
    /// File where the call occurred
    pub file_name: Option<String>,
    /// Additional context information
    pub context: Option<String>,
}

impl CallFrame {
    /// Creates a new call frame.
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            call_site: None,
            definition_site: None,
            file_name: None,
            context: None,
        }
    }
    
    /// Creates a call frame with call site information.
    pub fn with_call_site(mut self, call_site: Span) -> Self {
        self.call_site = Some(call_site);
        self
    }
    
    /// Creates a call frame with definition site information.
    pub fn with_definition_site(mut self, definition_site: Span) -> Self {
        self.definition_site = Some(definition_site);
        self
    }
    
    /// Creates a call frame with file information.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into())
        self
    }
    
    /// Creates a call frame with context information.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into())
        self
    }
    
    /// Returns true if this frame has location information.
    pub fn has_location(&self) -> bool {
        self.call_site.is_some() || self.definition_site.is_some()
    }
    
    /// Gets the primary span for this frame (call site if available, otherwise definition site).
    pub fn primary_span(&self) -> Option<Span> {
        self.call_site.or(self.definition_site)
    }
}

impl fmt::Display for CallFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  at {}", self.function_name)?;
        
        if let Some(file) = &self.file_name {
            write!(f, " in {}", file)?;
        }
        
        if let Some(call_site) = &self.call_site {
            write!(f, " (byte offset {})", call_site.start)?;
        } else if let Some(def_site) = &self.definition_site {
            write!(f, " (defined at byte offset {})", def_site.start)?;
        }
        
        if let Some(context) = &self.context {
            write!(f, " [{}]", context)?;
        }
        
        Ok(())
    }
}

/// Represents a complete call stack for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStack {
    /// Stack frames from most recent to oldest
    pub frames: Vec<CallFrame>,
    /// Maximum number of frames to display
    pub max_display_frames: usize,
}

impl CallStack {
    /// Creates a new empty call stack.
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            max_display_frames: 10,
        }
    }
    
    /// Creates a call stack with a maximum display limit.
    pub fn with_limit(max_display_frames: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_display_frames,
        }
    }
    
    /// Pushes a new frame onto the stack.
    pub fn push(&mut self, frame: CallFrame) {
        self.frames.push(frame);
    }
    
    /// Pops the most recent frame from the stack.
    pub fn pop(&mut self) -> Option<CallFrame> {
        self.frames.pop()
    }
    
    /// Gets the current stack depth.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
    
    /// Checks if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
    
    /// Gets the most recent frame.
    pub fn top(&self) -> Option<&CallFrame> {
        self.frames.last()
    }
    
    /// Gets all frames in reverse order (most recent first).
    pub fn frames(&self) -> impl Iterator<Item = &CallFrame> {
        self.frames.iter().rev()
    }
    
    /// Gets frames for display, respecting the maximum display limit.
    pub fn display_frames(&self) -> impl Iterator<Item = &CallFrame> {
        let skip_count = if self.frames.len() > self.max_display_frames {
            self.frames.len() - self.max_display_frames
        } else {
            0
        };
        
        self.frames.iter().rev().skip(skip_count)
    }
    
    /// Returns true if there are more frames than can be displayed.
    pub fn has_hidden_frames(&self) -> bool {
        self.frames.len() > self.max_display_frames
    }
    
    /// Gets the number of hidden frames.
    pub fn hidden_frame_count(&self) -> usize {
        if self.frames.len() > self.max_display_frames {
            self.frames.len() - self.max_display_frames
        } else {
            0
        }
    }
    
    /// Clears all frames from the stack.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
    
    /// Creates a new call stack with a single frame.
    pub fn single(frame: CallFrame) -> Self {
        let mut stack = Self::new();
        stack.push(frame);
        stack
    }
    
    /// Finds a frame by function name.
    pub fn find_frame(&self, function_name: &str) -> Option<&CallFrame> {
        self.frames.iter().find(|frame| frame.function_name == function_name)
    }
    
    /// Gets all frames with location information.
    pub fn frames_with_location(&self) -> impl Iterator<Item = &CallFrame> {
        self.frames.iter().filter(|frame| frame.has_location())
    }
    
    /// Formats the stack trace with line numbers and context.
    pub fn format_detailed(&self) -> String {
        if self.frames.is_empty() {
            return "  <no stack trace available>".to_string();
        }
        
        let mut result = String::new();
        
        if self.has_hidden_frames() {
            result.push_str(&format!("  ... {} more frames ...\n", self.hidden_frame_count()));
        }
        
        for frame in self.display_frames() {
            result.push_str(&format!("{}\n", frame));
        }
        
        result.trim_end().to_string()
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            write!(f, "<no stack trace available>")
        } else {
            write!(f, "{}", self.format_detailed())
        }
    }
}

/// Builder for constructing call stacks incrementally.
#[derive(Debug)]
pub struct CallStackBuilder {
    stack: CallStack,
}

impl CallStackBuilder {
    /// Creates a new call stack builder.
    pub fn new() -> Self {
        Self {
            stack: CallStack::new(),
        }
    }
    
    /// Creates a builder with a display limit.
    pub fn with_limit(max_display_frames: usize) -> Self {
        Self {
            stack: CallStack::with_limit(max_display_frames),
        }
    }
    
    /// Adds a frame to the stack.
    pub fn frame(mut self, frame: CallFrame) -> Self {
        self.stack.push(frame);
        self
    }
    
    /// Adds a simple frame with just a function name.
    pub fn simple_frame(mut self, function_name: impl Into<String>) -> Self {
        self.stack.push(CallFrame::new(function_name));
        self
    }
    
    /// Adds a frame with location information.
    pub fn frame_with_location(
        mut self,
        function_name: impl Into<String>,
        call_site: Span,
        file_name: Option<String>,
    ) -> Self {
        let mut frame = CallFrame::new(function_name);
        frame.call_site = Some(call_site);
        frame.file_name = file_name;
        self.stack.push(frame);
        self
    }
    
    /// Builds the final call stack.
    pub fn build(self) -> CallStack {
        self.stack
    }
}

impl Default for CallStackBuilder {
    fn default() -> Self {
        Self::new()
    }
}
