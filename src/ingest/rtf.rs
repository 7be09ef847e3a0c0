//! Reduce RTF documents to their plain text.

/// Destinations whose content is never part of the visible text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl", "colortbl", "stylesheet", "info", "pict", "object", "header", "headerl",
    "headerr", "headerf", "footer", "footerl", "footerr", "footerf", "listtable",
    "listoverridetable", "rsidtbl", "generator", "xmlnstbl", "datastore", "themedata",
    "latentstyles", "colorschememapping", "fldinst", "filetbl", "revtbl", "mmathPr",
];

pub fn is_rtf(text: &str) -> bool {
    text.trim_start().starts_with("{\\rtf")
}

#[derive(Clone, Copy)]
struct Group {
    ignorable: bool,
    uc: usize,
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    out: String,
    bytes: Vec<u8>,
    stack: Vec<Group>,
    group: Group,
    /// Fallback characters still to drop after a `\u` escape.
    skip: usize,
}

impl<'a> Parser<'a> {
    fn new(rtf: &'a str) -> Self {
        Self {
            chars: rtf.chars().peekable(),
            out: String::with_capacity(rtf.len() / 2),
            bytes: Vec::new(),
            stack: Vec::new(),
            group: Group { ignorable: false, uc: 1 },
            skip: 0,
        }
    }

    fn flush_bytes(&mut self) {
        if !self.bytes.is_empty() {
            let (cow, _, _) = encoding_rs::WINDOWS_1252.decode(&self.bytes);
            self.out.push_str(&cow);
            self.bytes.clear();
        }
    }

    fn emit(&mut self, text: &str) {
        if self.skip > 0 {
            self.skip -= 1;
            return;
        }
        if !self.group.ignorable {
            self.flush_bytes();
            self.out.push_str(text);
        }
    }

    fn emit_byte(&mut self, byte: u8) {
        if self.skip > 0 {
            self.skip -= 1;
            return;
        }
        if !self.group.ignorable {
            self.bytes.push(byte);
        }
    }

    fn run(mut self) -> String {
        while let Some(ch) = self.chars.next() {
            match ch {
                '{' => {
                    self.flush_bytes();
                    self.stack.push(self.group);
                }
                '}' => {
                    self.flush_bytes();
                    if let Some(group) = self.stack.pop() {
                        self.group = group;
                    }
                }
                '\\' => self.control(),
                '\r' | '\n' => {}
                other => {
                    let mut buf = [0u8; 4];
                    self.emit(other.encode_utf8(&mut buf));
                }
            }
        }
        self.flush_bytes();
        self.out.trim().to_string()
    }

    fn control(&mut self) {
        let Some(ch) = self.chars.next() else { return };
        match ch {
            '\\' | '{' | '}' => {
                let mut buf = [0u8; 4];
                self.emit(ch.encode_utf8(&mut buf));
            }
            '\'' => {
                let hex: String = (0..2).filter_map(|_| self.chars.next()).collect();
                if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                    self.emit_byte(byte);
                }
            }
            '*' => self.group.ignorable = true,
            '~' => self.emit("\u{a0}"),
            '_' => self.emit("-"),
            '\r' | '\n' => self.emit("\n"),
            c if c.is_ascii_alphabetic() => {
                let mut word = String::from(c);
                while let Some(&next) = self.chars.peek() {
                    if next.is_ascii_alphabetic() {
                        word.push(next);
                        self.chars.next();
                    } else {
                        break;
                    }
                }

                let mut param = String::new();
                if self.chars.peek() == Some(&'-') {
                    param.push('-');
                    self.chars.next();
                }
                while let Some(&next) = self.chars.peek() {
                    if next.is_ascii_digit() {
                        param.push(next);
                        self.chars.next();
                    } else {
                        break;
                    }
                }
                if self.chars.peek() == Some(&' ') {
                    self.chars.next();
                }

                self.word(&word, param.parse::<i32>().ok());
            }
            _ => {}
        }
    }

    fn word(&mut self, word: &str, param: Option<i32>) {
        if SKIPPED_DESTINATIONS.contains(&word) {
            self.group.ignorable = true;
            return;
        }

        match word {
            "par" | "line" | "sect" | "page" | "row" => self.emit("\n"),
            "tab" | "cell" => self.emit("\t"),
            "emdash" => self.emit("\u{2014}"),
            "endash" => self.emit("\u{2013}"),
            "lquote" => self.emit("\u{2018}"),
            "rquote" => self.emit("\u{2019}"),
            "ldblquote" => self.emit("\u{201c}"),
            "rdblquote" => self.emit("\u{201d}"),
            "bullet" => self.emit("\u{2022}"),
            "uc" => {
                if let Some(n) = param {
                    self.group.uc = n.max(0) as usize;
                }
            }
            "u" => {
                if let Some(n) = param {
                    let code = (if n < 0 { n + 65536 } else { n }) as u32;
                    if let Some(c) = char::from_u32(code) {
                        let mut buf = [0u8; 4];
                        self.emit(c.encode_utf8(&mut buf));
                    }
                    self.skip = self.group.uc;
                }
            }
            _ => {}
        }
    }
}

/// Strip RTF markup, leaving the document's text. Input that is not RTF is
/// returned unchanged.
pub fn rtf_to_text(rtf: &str) -> String {
    if !is_rtf(rtf) {
        return rtf.to_string();
    }
    Parser::new(rtf).run()
}
