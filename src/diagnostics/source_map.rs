//! Source mapping and position tracking for error reporting.

use super::{Span, Position};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps source code to line/column positions for error reporting.
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// Source file name
    pub filename: String,
    /// Complete source text
    pub source: String,
    /// Line start positions (byte offsets)
    line_starts: Vec<usize>,
    /// File ID for this source
    pub file_id: usize,
}

impl SourceMap {
    /// Creates a new source map from source text.
    pub fn new(filename: String, source: String, file_id: usize) -> Self {
        let mut line_starts = vec![0];
        
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        
        Self {
            filename,
            source,
            line_starts,
            file_id,
        }
    }
    
    /// Converts a byte offset to line/column position.
    pub fn position_at_offset(&self, offset: usize) -> Position {
        let line = self.line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i.saturating_sub(1));
        
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        let column = offset.saturating_sub(line_start) + 1;
        
        Position::new(line + 1, column, offset)
    }
    
    /// Creates a span with position information.
    pub fn span_with_position(&self, start: usize, len: usize) -> Span {
        let _pos = self.position_at_offset(start);
        Span::with_file(start, len, self.file_id)
    }
    
    /// Gets the source text for a span.
    pub fn source_text(&self, span: &Span) -> &str {
        let start = span.start.min(self.source.len());
        let end = span.end().min(self.source.len());
        &self.source[start..end]
    }
    
    /// Gets the line text containing a span.
    pub fn line_text(&self, span: &Span) -> &str {
        let pos = self.position_at_offset(span.start);
        let line_idx = pos.line.saturating_sub(1);
        
        if line_idx < self.line_starts.len() {
            let line_start = self.line_starts[line_idx];
            let line_end = self.line_starts
                .get(line_idx + 1)
                .copied()
                .unwrap_or(self.source.len());
            
            let line_text = &self.source[line_start..line_end];
            line_text.trim_end_matches('\n')
        } else {
            ""
        }
    }
    
    /// Gets context lines around a span for error display.
    pub fn context_lines(&self, span: &Span, context_size: usize) -> Vec<(usize, String)> {
        let pos = self.position_at_offset(span.start);
        let center_line = pos.line.saturating_sub(1);
        
        let start_line = center_line.saturating_sub(context_size);
        let end_line = (center_line + context_size + 1).min(self.line_starts.len());
        
        (start_line..end_line)
            .map(|line_idx| {
                let line_start = self.line_starts[line_idx];
                let line_end = self.line_starts
                    .get(line_idx + 1)
                    .copied()
                    .unwrap_or(self.source.len());
                
                let line_text = self.source[line_start..line_end]
                    .trim_end_matches('\n')
                    .to_string();
                
                (line_idx + 1, line_text)
            })
            .collect()
    }
    
    /// Calculates column indicators for underlining errors.
    pub fn column_indicators(&self, span: &Span) -> (usize, usize) {
        let start_pos = self.position_at_offset(span.start);
        let end_pos = self.position_at_offset(span.end());
        
        if start_pos.line == end_pos.line {
            (start_pos.column, end_pos.column)
        } else {
            // Multi-line span, just show start column
            (start_pos.column, start_pos.column + span.len)
        }
    }
    
    /// Gets the number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
    
    /// Checks if an offset is valid for this source.
    pub fn is_valid_offset(&self, offset: usize) -> bool {
        offset <= self.source.len()
    }
}

/// Registry for managing multiple source files.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<usize, Arc<SourceMap>>,
    next_file_id: usize,
}

impl SourceRegistry {
    /// Creates a new source registry.
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
            next_file_id: 1,
        }
    }
    
    /// Registers a new source file.
    pub fn register_source(&mut self, filename: String, source: String) -> usize {
        let file_id = self.next_file_id;
        self.next_file_id += 1;
        
        let source_map = Arc::new(SourceMap::new(filename, source, file_id));
        self.sources.insert(file_id, source_map);
        
        file_id
    }
    
    /// Gets a source map by file ID.
    pub fn get_source(&self, file_id: usize) -> Option<Arc<SourceMap>> {
        self.sources.get(&file_id).clone())()
    }
    
    /// Gets all registered sources.
    pub fn all_sources(&self) -> impl Iterator<Item = (usize, Arc<SourceMap>)> + '_ {
        self.sources.iter().map(|(&id, source)| (id, source.clone()))
    }
    
    /// Removes a source file from the registry.
    pub fn remove_source(&mut self, file_id: usize) -> Option<Arc<SourceMap>> {
        self.sources.remove(&file_id)
    }
    
    /// Clears all registered sources.
    pub fn clear(&mut self) {
        self.sources.clear();
        self.next_file_id = 1;
    }
}
