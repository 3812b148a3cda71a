use std::io::Write;

use qrpix_core::{Module, ModuleMatrix};

/// Renders a [ModuleMatrix] as lines of text.
#[derive(Debug, Clone)]
pub struct AsciiRenderer {
    light_pattern: Box<str>,
    dark_pattern: Box<str>,
}

impl AsciiRenderer {
    /// Construct a new [AsciiRenderer] that uses "██" to render dark modules and "  " to print light ones.
    pub fn new() -> Self {
        Self {
            light_pattern: "  ".into(),
            dark_pattern: "██".into(),
        }
    }

    /// Set the light module `pattern` to be used when rendering.
    pub fn with_light_pattern(mut self, pattern: &str) -> Self {
        self.light_pattern = pattern.into();
        self
    }

    /// Set the dark module `pattern` to be used when rendering.
    pub fn with_dark_pattern(mut self, pattern: &str) -> Self {
        self.dark_pattern = pattern.into();
        self
    }

    /// Invert the light and dark patterns.
    pub fn inverted(mut self) -> Self {
        std::mem::swap(&mut self.light_pattern, &mut self.dark_pattern);
        self
    }

    fn pattern(&self, module: Module) -> &str {
        match module {
            Module::Dark => &self.dark_pattern,
            Module::Light => &self.light_pattern,
        }
    }

    /// Render `matrix` into `output`, one line per row of modules.
    pub fn render<W: Write + ?Sized>(&self, output: &mut W, matrix: &ModuleMatrix) -> std::io::Result<()> {
        for y in 0..matrix.side() {
            for module in matrix.row(y).into_iter().flatten() {
                output.write_all(self.pattern(module).as_bytes())?;
            }
            writeln!(output)?;
        }
        Ok(())
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}
