use serde::{Deserialize, Serialize};

/// Request body for the collaborator's `POST /execute` endpoint. Multi-command
/// scripts travel as newline-separated text in the same field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub comandos: String,
}

/// Response body of `POST /execute`: the raw execution transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResponse {
    #[serde(default)]
    pub salida: String,
}

/// Substring the backend emits on successful authentication.
pub const LOGIN_SUCCESS_MARKER: &str = "Sesión iniciada para";

/// A command in the collaborator's administration language.
///
/// Rendering is a serialization step with a fixed quoting contract: every
/// argument value is double-quoted, with `\` and `"` escaped, so values
/// containing quotes or whitespace cannot corrupt the grammar. The backend
/// strips surrounding quotes from each value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login {
        username: String,
        password: String,
        partition_id: String,
    },
    Logout,
    DiskInfo,
    PartitionInfo {
        disk_path: String,
    },
    List {
        path: String,
        partition_id: String,
    },
    Cat {
        file_path: String,
    },
}

impl Command {
    pub fn render(&self) -> String {
        match self {
            Command::Login {
                username,
                password,
                partition_id,
            } => format!(
                "login -user={} -pass={} -id={}",
                quote_arg(username),
                quote_arg(password),
                quote_arg(partition_id)
            ),
            Command::Logout => "logout".to_string(),
            Command::DiskInfo => "diskinfo".to_string(),
            Command::PartitionInfo { disk_path } => {
                format!("partitioninfo -path={}", quote_arg(disk_path))
            }
            Command::List { path, partition_id } => format!(
                "ls -path={} -id={}",
                quote_arg(path),
                quote_arg(partition_id)
            ),
            Command::Cat { file_path } => format!("cat -file={}", quote_arg(file_path)),
        }
    }
}

/// Quote an argument value for the command grammar.
pub fn quote_arg(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Inverse of [`quote_arg`]: strip the surrounding quotes and unescape.
/// Used by tests to assert the grammar round-trips; `None` when the input
/// is not a well-formed quoted value.
pub fn unquote_arg(value: &str) -> Option<String> {
    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            out.push(chars.next()?);
        } else if ch == '"' {
            return None;
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_login_with_quoted_arguments() {
        let cmd = Command::Login {
            username: "root".into(),
            password: "123".into(),
            partition_id: "391A".into(),
        };
        assert_eq!(cmd.render(), r#"login -user="root" -pass="123" -id="391A""#);
    }

    #[test]
    fn renders_ls_and_cat() {
        let ls = Command::List {
            path: "/docs".into(),
            partition_id: "291A".into(),
        };
        assert_eq!(ls.render(), r#"ls -path="/docs" -id="291A""#);

        let cat = Command::Cat {
            file_path: "/users.txt".into(),
        };
        assert_eq!(cat.render(), r#"cat -file="/users.txt""#);
    }

    #[test]
    fn quoting_round_trips_hostile_values() {
        let hostile = [
            "plain",
            "has space",
            "trailing\\",
            "quote\"inside",
            "\"wrapped\"",
            "mix \\\" of both",
            "",
        ];
        for value in hostile {
            let quoted = quote_arg(value);
            assert_eq!(unquote_arg(&quoted).as_deref(), Some(value), "value: {value:?}");
        }
    }

    #[test]
    fn quoted_value_never_contains_bare_quote() {
        let quoted = quote_arg("a\"b\"c");
        let interior = &quoted[1..quoted.len() - 1];
        let mut prev_backslash = false;
        for ch in interior.chars() {
            if ch == '"' {
                assert!(prev_backslash, "bare quote leaked into grammar: {quoted}");
            }
            prev_backslash = ch == '\\' && !prev_backslash;
        }
    }
}
