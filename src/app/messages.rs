//! Turns structured build events into user-facing text.
//!
//! The language is an explicit value carried by [`Messages`]; nothing here
//! reads process-wide state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::tasks::{StartError, ValidationError};
use crate::core::{BuildError, ProgressMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "vi")]
    Vietnamese,
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Vietnamese, Language::English, Language::Japanese];

    pub fn code(self) -> &'static str {
        match self {
            Language::Vietnamese => "vi",
            Language::English => "en",
            Language::Japanese => "ja",
        }
    }

    /// The language's name written in that language.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Vietnamese => "Tiếng Việt",
            Language::English => "English",
            Language::Japanese => "日本語",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported language '{s}', expected one of: vi, en, ja"))
    }
}

#[derive(Debug, Clone, Copy)]
enum Key {
    Starting,
    StoppedByUser,
    DirectoryCreated,
    FileCreated,
    Done,
    Syntax,
    Indentation,
    Permission,
    System,
    Critical,
    MissingTree,
    MissingOutput,
    AlreadyRunning,
}

/// Template for `key` as `(vi, en, ja)`. Placeholders are `{name}`-style.
fn templates(key: Key) -> (&'static str, &'static str, &'static str) {
    match key {
        Key::Starting => (
            "Bắt đầu phân tích cây thư mục...",
            "Starting directory tree analysis...",
            "ディレクトリツリーの解析を開始...",
        ),
        Key::StoppedByUser => (
            "Đã dừng bởi người dùng.",
            "Stopped by user.",
            "ユーザーによって停止されました。",
        ),
        Key::DirectoryCreated => (
            "Đã tạo thư mục: {name}",
            "Created directory: {name}",
            "ディレクトリを作成しました: {name}",
        ),
        Key::FileCreated => (
            "Đã tạo tệp: {name}",
            "Created file: {name}",
            "ファイルを作成しました: {name}",
        ),
        Key::Done => ("Hoàn tất!", "Done!", "完了！"),
        Key::Syntax => (
            "Lỗi cú pháp dòng {line}: Không thể phân tích '{content}'",
            "Syntax error on line {line}: Cannot parse '{content}'",
            "行 {line} の構文エラー: '{content}' を解析できません",
        ),
        Key::Indentation => (
            "Cảnh báo: Cấu trúc thụt lề bất thường ở dòng {line}. Đang cố gắng xử lý.",
            "Warning: Unusual indentation structure at line {line}. Attempting to process.",
            "警告: 行 {line} のインデント構造が異常です。処理を試みます。",
        ),
        Key::Permission => (
            "Lỗi quyền truy cập khi tạo: {path}",
            "Permission error while creating: {path}",
            "作成中の権限エラー: {path}",
        ),
        Key::System => (
            "Lỗi hệ thống khi tạo {path}: {error}",
            "System error creating {path}: {error}",
            "{path} の作成中にシステムエラー: {error}",
        ),
        Key::Critical => (
            "Lỗi nghiêm trọng trong quá trình xử lý: {error}",
            "Critical error during processing: {error}",
            "処理中に重大なエラー: {error}",
        ),
        Key::MissingTree => (
            "Vui lòng dán cây thư mục vào ô nhập liệu.",
            "Please paste the directory tree into the input box.",
            "入力ボックスにディレクトリツリーを貼り付けてください。",
        ),
        Key::MissingOutput => (
            "Vui lòng chọn thư mục đầu ra.",
            "Please select an output directory.",
            "出力ディレクトリを選択してください。",
        ),
        Key::AlreadyRunning => (
            "Một tiến trình đang chạy.",
            "A process is already running.",
            "プロセスが実行中です。",
        ),
    }
}

/// Formats events and errors for one language.
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages {
    language: Language,
}

impl Messages {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn render(&self, key: Key, args: &[(&str, &str)]) -> String {
        let (vi, en, ja) = templates(key);
        let template = match self.language {
            Language::Vietnamese => vi,
            Language::English => en,
            Language::Japanese => ja,
        };
        args.iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }

    pub fn progress(&self, message: &ProgressMessage) -> String {
        match message {
            ProgressMessage::Starting => self.render(Key::Starting, &[]),
            ProgressMessage::DirectoryCreated { name } => {
                self.render(Key::DirectoryCreated, &[("name", name.as_str())])
            }
            ProgressMessage::FileCreated { name } => {
                self.render(Key::FileCreated, &[("name", name.as_str())])
            }
            ProgressMessage::StoppedByUser => self.render(Key::StoppedByUser, &[]),
            ProgressMessage::Done => self.render(Key::Done, &[]),
        }
    }

    pub fn error(&self, error: &BuildError) -> String {
        match error {
            BuildError::Unparseable { line, content } => self.render(
                Key::Syntax,
                &[("line", line.to_string().as_str()), ("content", content.as_str())],
            ),
            BuildError::IndentationAnomaly { line } => {
                self.render(Key::Indentation, &[("line", line.to_string().as_str())])
            }
            BuildError::PermissionDenied { path, .. } => {
                self.render(Key::Permission, &[("path", path.display().to_string().as_str())])
            }
            BuildError::Filesystem { path, source, .. } => self.render(
                Key::System,
                &[
                    ("path", path.display().to_string().as_str()),
                    ("error", source.to_string().as_str()),
                ],
            ),
            BuildError::Critical(error) => self.render(Key::Critical, &[("error", error.as_str())]),
        }
    }

    pub fn validation(&self, error: &ValidationError) -> String {
        match error {
            ValidationError::MissingTree => self.render(Key::MissingTree, &[]),
            ValidationError::MissingOutput => self.render(Key::MissingOutput, &[]),
        }
    }

    pub fn start_error(&self, error: &StartError) -> String {
        match error {
            StartError::Invalid(e) => self.validation(e),
            StartError::AlreadyRunning => self.render(Key::AlreadyRunning, &[]),
        }
    }
}
