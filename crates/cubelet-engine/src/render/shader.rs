//! Shader compilation with logged diagnostics.
//!
//! wgpu reports WGSL problems in two places: the module's compilation info
//! (errors, warnings, notes with source locations) and device validation
//! errors. Both are funneled into the log here instead of panicking.

use std::fmt;

/// Severity of a compiler message.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One compiler message, detached from wgpu's types.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderDiagnostic {
    pub severity: Severity,
    /// 1-based `(line, column)`, when the compiler knows it.
    pub location: Option<(u32, u32)>,
    pub message: String,
}

impl From<&wgpu::CompilationMessage> for ShaderDiagnostic {
    fn from(m: &wgpu::CompilationMessage) -> Self {
        let severity = match m.message_type {
            wgpu::CompilationMessageType::Error => Severity::Error,
            wgpu::CompilationMessageType::Warning => Severity::Warning,
            wgpu::CompilationMessageType::Info => Severity::Info,
        };
        Self {
            severity,
            location: m.location.as_ref().map(|l| (l.line_number, l.line_position)),
            message: m.message.clone(),
        }
    }
}

impl fmt::Display for ShaderDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some((line, col)) => write!(f, "{line}:{col}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Logs every diagnostic under `label` and returns how many were errors.
pub fn log_diagnostics(label: &str, diagnostics: &[ShaderDiagnostic]) -> usize {
    let mut errors = 0;
    for d in diagnostics {
        match d.severity {
            Severity::Error => {
                errors += 1;
                log::error!("shader `{label}`: {d}");
            }
            Severity::Warning => log::warn!("shader `{label}`: {d}"),
            Severity::Info => log::info!("shader `{label}`: {d}"),
        }
    }
    errors
}

/// Compiles WGSL `source` into a shader module.
///
/// Compiler messages and validation errors are logged; the returned module
/// may be invalid if compilation failed, in which case pipeline creation
/// reports the failure too.
pub fn compile_wgsl(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let info = pollster::block_on(module.get_compilation_info());
    let diagnostics: Vec<ShaderDiagnostic> = info.messages.iter().map(Into::into).collect();
    let errors = log_diagnostics(label, &diagnostics);

    if let Some(err) = pollster::block_on(scope.pop()) {
        log::error!("shader `{label}` failed validation: {err}");
    } else if errors == 0 {
        log::debug!("shader `{label}` compiled");
    }

    module
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(severity: Severity, location: Option<(u32, u32)>, message: &str) -> ShaderDiagnostic {
        ShaderDiagnostic {
            severity,
            location,
            message: message.to_string(),
        }
    }

    #[test]
    fn counts_only_errors() {
        let ds = [
            diag(Severity::Warning, None, "unused variable"),
            diag(Severity::Error, Some((3, 7)), "expected `;`"),
            diag(Severity::Info, None, "note"),
            diag(Severity::Error, None, "unknown type"),
        ];
        assert_eq!(log_diagnostics("test", &ds), 2);
    }

    #[test]
    fn no_diagnostics_no_errors() {
        assert_eq!(log_diagnostics("test", &[]), 0);
    }

    #[test]
    fn display_includes_location_when_known() {
        let d = diag(Severity::Error, Some((12, 5)), "bad token");
        assert_eq!(d.to_string(), "12:5: bad token");
        assert_eq!(diag(Severity::Error, None, "bad token").to_string(), "bad token");
    }

    #[test]
    fn cube_shader_declares_both_entry_points() {
        let src = include_str!("shaders/cube.wgsl");
        assert!(src.contains("fn vs_main"));
        assert!(src.contains("fn fs_main"));
        assert!(src.contains("@group(0) @binding(0)"));
    }
}
