//! Bundled minifiers: oxc for JavaScript, lightningcss for CSS.

use super::MinifyError;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::path::Path;

/// Minify JavaScript source code.
///
/// Parsed as a classic script. Top-level declarations are globals of the
/// page, so neither the compressor nor the mangler may touch them.
pub fn minify_js(source: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::script()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(err.to_string());
    }
    if ret.panicked {
        return Err("parser gave up".into());
    }

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, String> {
    let stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(|e| e.to_string())?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;
    Ok(result.code)
}

/// Minify `content` according to the extension of `path`.
pub fn minify_by_ext(path: &Path, content: &[u8]) -> Result<Vec<u8>, MinifyError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let minify: fn(&str) -> Result<String, String> = match ext {
        "js" | "mjs" | "cjs" => minify_js,
        "css" => minify_css,
        _ => {
            return Err(MinifyError::Unsupported {
                path: path.to_path_buf(),
            });
        }
    };

    let source = std::str::from_utf8(content).map_err(|e| MinifyError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    minify(source)
        .map(String::into_bytes)
        .map_err(|message| MinifyError::Parse {
            path: path.to_path_buf(),
            message,
        })
}
