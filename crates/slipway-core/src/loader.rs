//! Config file discovery and parsing.
//!
//! Loads `slipway.config.json`, `slipway.config.js`, or `vite.config.js`
//! from a project root and produces a [`RawOptions`] for the resolver.
//!
//! JSON configs go straight through serde. `.js` configs are declarative
//! object literals: the loader strips comments, unwraps
//! `export default { … }` (a `defineConfig(…)` wrapper is accepted), and
//! reads the literal with a small JSON5-ish reader (single quotes, unquoted
//! and dotted keys, trailing commas). Plugin invocations like `vue()` degrade
//! to named opaque descriptors; their arguments are not evaluated.

use crate::error::Error;
use crate::options::{PluginSpec, RawOptions};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Config file names in priority order.
const CONFIG_FILES: &[&str] = &["slipway.config.json", "slipway.config.js", "vite.config.js"];

/// Find a config file in the given root directory.
#[must_use]
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.exists())
}

/// Load raw options from a config file in the given root directory.
///
/// If `config_path` is `Some`, that file is used (relative paths are joined
/// onto `root`); otherwise the well-known names are tried in priority order.
/// Returns `Ok(None)` when nothing was auto-discovered.
pub fn load_options(
    root: &Path,
    config_path: Option<&Path>,
) -> Result<Option<(PathBuf, RawOptions)>, Error> {
    let path = match config_path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => root.join(p),
        None => match find_config_file(root) {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    let source = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;

    let options = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&source).map_err(|e| Error::ConfigParse {
            path: path.clone(),
            reason: e.to_string(),
        })?
    } else {
        let value = parse_config_source(&source).map_err(|reason| Error::ConfigParse {
            path: path.clone(),
            reason,
        })?;
        options_from_value(&value).map_err(|reason| Error::ConfigParse {
            path: path.clone(),
            reason,
        })?
    };

    Ok(Some((path, options)))
}

/// Parse a `.js` config source down to its exported object literal.
fn parse_config_source(source: &str) -> Result<Value, String> {
    let stripped = strip_comments(source);

    let marker = "export default";
    let idx = stripped
        .find(marker)
        .ok_or_else(|| "no `export default { ... }` found in config file".to_string())?;
    let mut body = stripped[idx + marker.len()..].trim_start();

    // Accept `export default defineConfig({ ... })`
    if let Some(rest) = body.strip_prefix("defineConfig") {
        let rest = rest.trim_start();
        body = rest
            .strip_prefix('(')
            .ok_or_else(|| "expected `(` after defineConfig".to_string())?
            .trim_start();
    }

    if !body.starts_with('{') {
        return Err("expected an object literal after `export default`".to_string());
    }

    let mut reader = LiteralReader::new(body);
    let value = reader.value()?;
    Ok(value)
}

/// Strip `//` and `/* */` comments, leaving string contents intact.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    while let Some(ch) = rest.chars().next() {
        if let Some(quote) = in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            rest = &rest[ch.len_utf8()..];
        } else if let Some(after) = rest.strip_prefix("//") {
            rest = after.find('\n').map_or("", |i| &after[i..]);
        } else if let Some(after) = rest.strip_prefix("/*") {
            // Keep newlines so line-oriented tooling stays usable
            let end = after.find("*/");
            let skipped = end.map_or(after, |i| &after[..i]);
            out.extend(skipped.chars().filter(|c| *c == '\n'));
            rest = end.map_or("", |i| &after[i + 2..]);
        } else {
            if ch == '"' || ch == '\'' || ch == '`' {
                in_string = Some(ch);
            }
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    out
}

/// Cursor-based reader for a JSON5-ish object literal.
struct LiteralReader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> LiteralReader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> Result<(), String> {
        let at = self.pos;
        match self.bump() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(format!("expected '{expected}', found '{ch}' at byte {at}")),
            None => Err(format!("expected '{expected}', found end of input")),
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn value(&mut self) -> Result<Value, String> {
        self.skip_ws();
        match self.peek() {
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some('"' | '\'') => self.string().map(Value::String),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' || ch == '$' => self.word(),
            Some(ch) => Err(format!("unexpected character '{ch}' at byte {}", self.pos)),
            None => Err("unexpected end of input".to_string()),
        }
    }

    fn object(&mut self) -> Result<Value, String> {
        self.eat('{')?;
        let mut map = serde_json::Map::new();

        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }

            let key = self.key()?;
            self.skip_ws();
            self.eat(':')?;
            let value = self.value()?;
            map.insert(key, value);

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                Some(ch) => return Err(format!("expected ',' or '}}' in object, found '{ch}'")),
                None => return Err("unterminated object".to_string()),
            }
        }
    }

    fn array(&mut self) -> Result<Value, String> {
        self.eat('[')?;
        let mut items = Vec::new();

        loop {
            self.skip_ws();
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::Array(items));
            }

            items.push(self.value()?);

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(ch) => return Err(format!("expected ',' or ']' in array, found '{ch}'")),
                None => return Err("unterminated array".to_string()),
            }
        }
    }

    /// Object key: quoted string or bare identifier. Dots are allowed in
    /// bare keys (`settings.instance: …`).
    fn key(&mut self) -> Result<String, String> {
        match self.peek() {
            Some('"' | '\'') => self.string(),
            Some(ch) if ch.is_alphanumeric() || ch == '_' || ch == '$' => {
                Ok(self.take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.')))
            }
            other => Err(format!("expected object key, found {other:?}")),
        }
    }

    fn string(&mut self) -> Result<String, String> {
        let quote = self.bump().ok_or("expected string")?;
        let mut s = String::new();

        loop {
            match self.bump() {
                Some(ch) if ch == quote => return Ok(s),
                Some('\\') => match self.bump() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some(ch @ ('\\' | '"' | '\'' | '`' | '/')) => s.push(ch),
                    Some(ch) => {
                        s.push('\\');
                        s.push(ch);
                    }
                    None => return Err("unterminated string escape".to_string()),
                },
                Some(ch) => s.push(ch),
                None => return Err("unterminated string".to_string()),
            }
        }
    }

    fn number(&mut self) -> Result<Value, String> {
        let text = self.take_while(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'));
        if text.contains(['.', 'e', 'E']) {
            let n: f64 = text.parse().map_err(|e| format!("invalid number '{text}': {e}"))?;
            serde_json::Number::from_f64(n)
                .map(Value::Number)
                .ok_or_else(|| format!("invalid number '{text}'"))
        } else {
            let n: i64 = text.parse().map_err(|e| format!("invalid number '{text}': {e}"))?;
            Ok(Value::Number(n.into()))
        }
    }

    /// Bare word: literal keyword, or an identifier. An identifier followed
    /// by `(…)` is a call expression: kept as its name, arguments skipped.
    fn word(&mut self) -> Result<Value, String> {
        let ident = self.take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '$'));
        match ident.as_str() {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            "null" | "undefined" => return Ok(Value::Null),
            _ => {}
        }

        self.skip_ws();
        if self.peek() == Some('(') {
            self.skip_call_arguments()?;
        }
        Ok(Value::String(ident))
    }

    /// Skip a balanced `(…)` group, respecting nested groups and strings.
    fn skip_call_arguments(&mut self) -> Result<(), String> {
        self.eat('(')?;
        let mut depth = 1usize;

        while depth > 0 {
            match self.bump() {
                Some('(') => depth += 1,
                Some(')') => depth -= 1,
                Some(quote @ ('"' | '\'' | '`')) => loop {
                    match self.bump() {
                        Some('\\') => {
                            self.bump();
                        }
                        Some(ch) if ch == quote => break,
                        Some(_) => {}
                        None => return Err("unterminated string in call arguments".to_string()),
                    }
                },
                Some(_) => {}
                None => return Err("unterminated call arguments".to_string()),
            }
        }
        Ok(())
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        self.input[start..self.pos].to_string()
    }
}

/// Map a parsed config value onto [`RawOptions`].
///
/// Unknown fields are ignored; the engine may understand more than the
/// resolver does. `build.rollupOptions.input` is accepted and flattened
/// into the entry mapping.
fn options_from_value(value: &Value) -> Result<RawOptions, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "config must be an object".to_string())?;

    let mut options = RawOptions::new();

    if let Some(plugins) = obj.get("plugins").and_then(Value::as_array) {
        for plugin in plugins {
            options.plugins.push(plugin_from_value(plugin)?);
        }
    }

    if let Some(root) = obj.get("root").and_then(Value::as_str) {
        options.root = Some(root.to_string());
    }
    if let Some(base) = obj.get("base").and_then(Value::as_str) {
        options.base = Some(base.to_string());
    }

    if let Some(server) = obj.get("server").and_then(Value::as_object) {
        if let Some(origin) = server.get("origin").and_then(Value::as_str) {
            options = options.with_origin(origin);
        }
        if let Some(port) = server.get("port").and_then(Value::as_u64) {
            options = options.with_port(u32::try_from(port).unwrap_or(u32::MAX));
        }
    }

    if let Some(build) = obj.get("build").and_then(Value::as_object) {
        if let Some(manifest) = build.get("manifest").and_then(Value::as_bool) {
            options = options.with_manifest(manifest);
        }
        if let Some(out_dir) = build.get("outDir").and_then(Value::as_str) {
            options = options.with_out_dir(out_dir);
        }
        if let Some(empty) = build.get("emptyOutDir").and_then(Value::as_bool) {
            options = options.with_empty_out_dir(empty);
        }
        if let Some(assets_dir) = build.get("assetsDir").and_then(Value::as_str) {
            options = options.with_assets_dir(assets_dir);
        }

        // `input` directly, or nested rollup-style
        let input = build.get("input").or_else(|| {
            build
                .get("rollupOptions")
                .and_then(Value::as_object)
                .and_then(|rollup| rollup.get("input"))
        });
        if let Some(input) = input.and_then(Value::as_object) {
            for (name, path) in input {
                let path = path
                    .as_str()
                    .ok_or_else(|| format!("entry \"{name}\" must be a string path"))?;
                options = options.entry(name, path);
            }
        }
    }

    if let Some(resolve) = obj.get("resolve").and_then(Value::as_object) {
        if let Some(alias) = resolve.get("alias").and_then(Value::as_object) {
            for (from, to) in alias {
                let to = to
                    .as_str()
                    .ok_or_else(|| format!("alias \"{from}\" must map to a string"))?;
                options = options.alias(from, to);
            }
        }
    }

    Ok(options)
}

fn plugin_from_value(value: &Value) -> Result<PluginSpec, String> {
    match value {
        Value::String(name) => Ok(PluginSpec::new(name)),
        Value::Object(obj) => {
            let name = obj
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| "plugin descriptor is missing a name".to_string())?;
            let mut spec = PluginSpec::new(name);
            if let Some(opts) = obj.get("options") {
                spec.options = opts.clone();
            }
            Ok(spec)
        }
        other => Err(format!("unsupported plugin descriptor: {other}")),
    }
}
