//! Key decoding for remote sessions.
//!
//! A remote session has no local tty for crossterm to read from. Keys
//! arrive as raw bytes on the SSH channel, so they are decoded here into
//! crossterm `KeyEvent`s and then mapped onto the core's logical `Key`s.
//!
//! A single channel read may contain several keys, or only part of one:
//! incomplete UTF-8 and escape sequences are held back until the rest
//! arrives.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;

use crate::core::action::Key;

const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;
const DEL: u8 = 0x7f;
/// Longest unfinished escape sequence kept between reads.
const MAX_PENDING_ESCAPE: usize = 16;

#[derive(Debug, Default)]
pub struct InputDecoder {
    pending: Vec<u8>,
}

impl InputDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes every complete key in `bytes`, buffering a trailing partial
    /// UTF-8 or escape sequence for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<KeyEvent> {
        self.pending.extend_from_slice(bytes);
        let buf = std::mem::take(&mut self.pending);

        let mut keys = Vec::new();
        let mut i = 0;
        while i < buf.len() {
            match buf[i] {
                ESC => match decode_escape(&buf[i..]) {
                    Escape::Complete(key, used) => {
                        keys.extend(key);
                        i += used;
                    }
                    Escape::Incomplete if buf.len() - i <= MAX_PENDING_ESCAPE => {
                        self.pending = buf[i..].to_vec();
                        break;
                    }
                    Escape::Incomplete => {
                        debug!("Dropping unterminated escape sequence");
                        break;
                    }
                },
                CTRL_C => {
                    keys.push(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
                    i += 1;
                }
                b'\t' => {
                    keys.push(KeyEvent::from(KeyCode::Tab));
                    i += 1;
                }
                b'\r' | b'\n' => {
                    keys.push(KeyEvent::from(KeyCode::Enter));
                    i += 1;
                }
                DEL | 0x08 => {
                    keys.push(KeyEvent::from(KeyCode::Backspace));
                    i += 1;
                }
                b if b < 0x20 => {
                    // Remaining control bytes: Ctrl+<letter>.
                    let c = char::from(b + b'a' - 1);
                    keys.push(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
                    i += 1;
                }
                b => {
                    let len = utf8_len(b);
                    if i + len > buf.len() {
                        self.pending = buf[i..].to_vec();
                        break;
                    }
                    match std::str::from_utf8(&buf[i..i + len]) {
                        Ok(s) => keys.extend(s.chars().map(|c| KeyEvent::from(KeyCode::Char(c)))),
                        Err(_) => debug!("Dropping invalid input byte {b:#04x}"),
                    }
                    i += len;
                }
            }
        }

        for key in &keys {
            debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
        }
        keys
    }
}

/// Byte length of the UTF-8 sequence introduced by `lead`. Invalid leads
/// count as one byte so they are skipped.
fn utf8_len(lead: u8) -> usize {
    match lead {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}

enum Escape {
    /// The key (if any) and the number of bytes consumed.
    Complete(Option<KeyEvent>, usize),
    /// The buffer ends before the sequence does.
    Incomplete,
}

/// Decodes an escape sequence at the start of `buf`.
fn decode_escape(buf: &[u8]) -> Escape {
    match buf.get(1) {
        None => Escape::Incomplete,
        Some(b'[') | Some(b'O') => {
            let Some(final_at) = buf[2..].iter().position(|b| (0x40..=0x7e).contains(b)) else {
                return Escape::Incomplete;
            };
            let end = 2 + final_at;
            let code = match buf[end] {
                b'A' => Some(KeyCode::Up),
                b'B' => Some(KeyCode::Down),
                b'C' => Some(KeyCode::Right),
                b'D' => Some(KeyCode::Left),
                b'H' => Some(KeyCode::Home),
                b'F' => Some(KeyCode::End),
                _ => None,
            };
            Escape::Complete(code.map(KeyEvent::from), end + 1)
        }
        // Anything else (Alt+<key>, ESC ESC): a bare Esc, the rest decodes on its own.
        Some(_) => Escape::Complete(Some(KeyEvent::from(KeyCode::Esc)), 1),
    }
}

/// Maps a decoded key onto the navigation keys.
pub fn key_for(event: &KeyEvent) -> Key {
    match (event.modifiers, event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Key::Quit,
        (_, KeyCode::Char('q')) => Key::Quit,
        (_, KeyCode::Tab) => Key::Tab,
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => Key::Next,
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => Key::Prev,
        (_, KeyCode::Enter) => Key::Activate,
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(bytes: &[u8]) -> Vec<Key> {
        InputDecoder::new().feed(bytes).iter().map(key_for).collect()
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(
            keys(b"qjk\t\r"),
            vec![Key::Quit, Key::Next, Key::Prev, Key::Tab, Key::Activate]
        );
        assert_eq!(keys(b"\n"), vec![Key::Activate]);
    }

    #[test]
    fn test_ctrl_c_quits() {
        assert_eq!(keys(&[CTRL_C]), vec![Key::Quit]);
    }

    #[test]
    fn test_arrow_keys_in_both_cursor_modes() {
        assert_eq!(keys(b"\x1b[A\x1b[B"), vec![Key::Prev, Key::Next]);
        assert_eq!(keys(b"\x1bOA\x1bOB"), vec![Key::Prev, Key::Next]);
    }

    #[test]
    fn test_other_keys() {
        assert_eq!(keys(b"x"), vec![Key::Other]);
        assert_eq!(keys(b"\x1b[C"), vec![Key::Other]);
        assert_eq!(keys(b"\x1b!"), vec![Key::Other, Key::Other]);
        assert_eq!(keys(&[DEL]), vec![Key::Other]);
    }

    #[test]
    fn test_unknown_csi_sequences_are_consumed() {
        // Delete key (ESC [ 3 ~) then j.
        let decoded = InputDecoder::new().feed(b"\x1b[3~j");
        assert_eq!(decoded, vec![KeyEvent::from(KeyCode::Char('j'))]);
    }

    #[test]
    fn test_split_utf8_is_buffered() {
        let mut decoder = InputDecoder::new();
        let bytes = "é".as_bytes();
        assert!(decoder.feed(&bytes[..1]).is_empty());
        assert_eq!(decoder.feed(&bytes[1..]), vec![KeyEvent::from(KeyCode::Char('é'))]);
    }

    #[test]
    fn test_escape_split_across_reads() {
        let mut decoder = InputDecoder::new();
        assert!(decoder.feed(b"\x1b").is_empty());
        assert_eq!(decoder.feed(b"[B"), vec![KeyEvent::from(KeyCode::Down)]);

        assert!(decoder.feed(b"\x1bO").is_empty());
        assert_eq!(decoder.feed(b"A"), vec![KeyEvent::from(KeyCode::Up)]);
    }

    #[test]
    fn test_lone_esc_is_delivered_with_the_next_read() {
        let mut decoder = InputDecoder::new();
        assert!(decoder.feed(b"\x1b").is_empty());
        let decoded: Vec<Key> = decoder.feed(b"j").iter().map(key_for).collect();
        assert_eq!(decoded, vec![Key::Other, Key::Next]);
    }

    #[test]
    fn test_overlong_unterminated_escape_is_dropped() {
        let mut decoder = InputDecoder::new();
        let mut junk = b"\x1b[".to_vec();
        junk.extend(std::iter::repeat_n(b'1', MAX_PENDING_ESCAPE));
        assert!(decoder.feed(&junk).is_empty());
        assert_eq!(decoder.feed(b"q"), vec![KeyEvent::from(KeyCode::Char('q'))]);
    }

    #[test]
    fn test_multibyte_chars_in_one_read() {
        let decoded = InputDecoder::new().feed("añq".as_bytes());
        let codes: Vec<KeyCode> = decoded.iter().map(|k| k.code).collect();
        assert_eq!(
            codes,
            vec![KeyCode::Char('a'), KeyCode::Char('ñ'), KeyCode::Char('q')]
        );
    }
}
