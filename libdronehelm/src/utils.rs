use log::{debug, warn};
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs helm with a prepared list of arguments.
pub trait HelmRunner {
    /// Runs helm, forwarding its output to ours.
    fn run(&self, args: &[String]) -> io::Result<()>;

    /// Runs helm, writing its standard output to `output` instead of ours.
    fn run_to_file(&self, args: &[String], output: &Path) -> io::Result<()>;
}

pub struct HelmBinary {
    pub program: String,
    pub kubeconfig: Option<String>,
}

impl HelmBinary {
    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(self.program.as_str());
        command.args(args);
        if let Some(ref c) = self.kubeconfig {
            command.env("KUBECONFIG", c);
        }
        command
    }
}

impl HelmRunner for HelmBinary {
    fn run(&self, args: &[String]) -> io::Result<()> {
        run_command_with_piped_stdio(self.program.as_str(), self.command(args))
    }

    fn run_to_file(&self, args: &[String], output: &Path) -> io::Result<()> {
        debug!(
            "Running command {} {:?} > {}",
            self.program,
            args,
            output.display()
        );

        // The output file is only touched once helm is running
        let mut child = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| spawn_error(self.program.as_str(), err))?;

        let copied = match child.stdout.take() {
            Some(mut stdout) => File::create(output)
                .and_then(|mut file| io::copy(&mut stdout, &mut file))
                .map(|_| ()),
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                "Failed to capture stdout",
            )),
        };

        let status = child.wait()?;
        copied?;
        if !status.success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} exited with {}", self.program, status),
            ));
        }
        Ok(())
    }
}

fn spawn_error(program: &str, err: io::Error) -> io::Error {
    io::Error::new(err.kind(), format!("Failed to execute {}: {}", program, err))
}

/// Copies `reader` to `writer` line by line, as raw bytes, and returns what was read
/// when `capture` is set.
///
/// Keeps draining `reader` when `writer` fails so the child never blocks on a full pipe.
fn forward_output(reader: impl Read, mut writer: impl Write, capture: bool) -> Vec<u8> {
    let mut reader = BufReader::new(reader);
    let mut captured = Vec::new();
    let mut line = Vec::new();
    let mut forwarding = true;

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                warn!("Unable to read command output: {}", err);
                break;
            }
        }

        if forwarding {
            if let Err(err) = writer.write_all(&line).and_then(|_| writer.flush()) {
                warn!("Unable to forward command output: {}", err);
                forwarding = false;
            }
        }
        if capture {
            captured.extend_from_slice(&line);
        }
    }

    captured
}

fn run_command_with_piped_stdio(program: &str, mut command: Command) -> io::Result<()> {
    debug!(
        "Running command {} {:?}",
        program,
        command.get_args().collect::<Vec<_>>()
    );

    let mut child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| spawn_error(program, err))?;

    let stdout_handle = child
        .stdout
        .take()
        .map(|stdout| std::thread::spawn(move || forward_output(stdout, io::stdout(), false)));
    let stderr_handle = child
        .stderr
        .take()
        .map(|stderr| std::thread::spawn(move || forward_output(stderr, io::stderr(), true)));

    if let Some(handle) = stdout_handle {
        if handle.join().is_err() {
            warn!("Reader of {} stdout panicked", program);
        }
    }
    let output_stderr = match stderr_handle.map(|handle| handle.join()) {
        Some(Ok(output)) => String::from_utf8_lossy(&output).trim_end().to_string(),
        Some(Err(_)) => {
            warn!("Reader of {} stderr panicked", program);
            String::new()
        }
        None => String::new(),
    };

    let status = child.wait()?;
    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            if output_stderr.is_empty() {
                format!("{} exited with {}", program, status)
            } else {
                output_stderr
            },
        ));
    }
    Ok(())
}

/// Interprets `s` as a Go-style quoted string literal: `"..."` with escapes,
/// `` `...` `` taken verbatim, or `'c'` holding a single character.
///
/// Returns `None` when `s` is not such a literal.
pub fn unquote(s: &str) -> Option<String> {
    let quote = s.chars().next()?;
    if !matches!(quote, '"' | '\'' | '`') || s.len() < 2 || !s.ends_with(quote) {
        return None;
    }
    let inner = &s[quote.len_utf8()..s.len() - quote.len_utf8()];

    match quote {
        '`' => {
            if inner.contains('`') {
                return None;
            }
            Some(inner.replace('\r', ""))
        }
        '"' | '\'' if inner.contains('\n') => None,
        '"' => unescape(inner, quote),
        '\'' => {
            let unescaped = unescape(inner, quote)?;
            if unescaped.chars().count() != 1 {
                return None;
            }
            Some(unescaped)
        }
        _ => None,
    }
}

/// Same as [`unquote`], falling back to `s` itself when it isn't quoted.
pub fn unquote_or_raw(s: &str) -> String {
    unquote(s).unwrap_or_else(|| s.to_string())
}

fn unescape(inner: &str, quote: char) -> Option<String> {
    // \x and octal escapes are raw bytes, the result is only checked for UTF-8 at the end
    let mut bytes: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == quote {
            return None;
        }
        if c != '\\' {
            push_char(&mut bytes, c);
            continue;
        }

        match chars.next()? {
            'a' => bytes.push(0x07),
            'b' => bytes.push(0x08),
            'f' => bytes.push(0x0c),
            'n' => bytes.push(b'\n'),
            'r' => bytes.push(b'\r'),
            't' => bytes.push(b'\t'),
            'v' => bytes.push(0x0b),
            '\\' => bytes.push(b'\\'),
            e @ ('"' | '\'') if e == quote => push_char(&mut bytes, e),
            'x' => bytes.push(u8::try_from(read_digits(&mut chars, 2, 16)?).ok()?),
            'u' => push_char(&mut bytes, char::from_u32(read_digits(&mut chars, 4, 16)?)?),
            'U' => push_char(&mut bytes, char::from_u32(read_digits(&mut chars, 8, 16)?)?),
            first @ '0'..='7' => {
                let rest = read_digits(&mut chars, 2, 8)?;
                let value = first.to_digit(8)? * 64 + rest;
                bytes.push(u8::try_from(value).ok()?);
            }
            _ => return None,
        }
    }

    String::from_utf8(bytes).ok()
}

fn push_char(bytes: &mut Vec<u8>, c: char) {
    let mut buffer = [0; 4];
    bytes.extend_from_slice(c.encode_utf8(&mut buffer).as_bytes());
}

fn read_digits(chars: &mut std::str::Chars, count: usize, radix: u32) -> Option<u32> {
    let mut value = 0;
    for _ in 0..count {
        value = value * radix + chars.next()?.to_digit(radix)?;
    }
    Some(value)
}

#[test]
fn test_unquote_double_quoted_string() {
    assert_eq!(Some("a=b".to_string()), unquote("\"a=b\""));
    assert_eq!(Some("a=b,c=d".to_string()), unquote("\"a=b,c=d\""));
    assert_eq!(Some("".to_string()), unquote("\"\""));
}

#[test]
fn test_unquote_double_quoted_string_with_escapes() {
    assert_eq!(Some("a=\"b\"".to_string()), unquote(r#""a=\"b\"""#));
    assert_eq!(Some("a\tb\nc\\".to_string()), unquote(r#""a\tb\nc\\""#));
    assert_eq!(Some("AAé".to_string()), unquote(r#""\x41\101\u00e9""#));
    assert_eq!(Some("😀".to_string()), unquote(r#""\U0001F600""#));
}

#[test]
fn test_unquote_raw_and_single_quoted_strings() {
    assert_eq!(Some("a=\\n".to_string()), unquote("`a=\\n`"));
    assert_eq!(Some("a".to_string()), unquote("'a'"));
    assert_eq!(Some("'".to_string()), unquote(r"'\''"));
    assert_eq!(None, unquote("'ab'"));
}

#[test]
fn test_unquote_rejects_invalid_literals() {
    assert_eq!(None, unquote("a=b"));
    assert_eq!(None, unquote(""));
    assert_eq!(None, unquote("\""));
    assert_eq!(None, unquote("\"a=b"));
    assert_eq!(None, unquote("\"a\"b\""));
    assert_eq!(None, unquote("\"a\\qb\""));
    assert_eq!(None, unquote("\"a\nb\""));
    assert_eq!(None, unquote("\"\\xff\""));
    assert_eq!(None, unquote("é"));
    assert_eq!(None, unquote("日"));
    assert_eq!(None, unquote("éaé"));
}

#[test]
fn test_unquote_or_raw_keeps_unquoted_values() {
    assert_eq!("a=b", unquote_or_raw("\"a=b\""));
    assert_eq!("a=b", unquote_or_raw("a=b"));
    assert_eq!("\"a=b", unquote_or_raw("\"a=b"));
    assert_eq!("日", unquote_or_raw("日"));
}
