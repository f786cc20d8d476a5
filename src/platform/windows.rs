//! Win32 backend
//!
//! Implements the three capability traits on top of `SendInput`,
//! `PostMessageW`/`AttachThreadInput`, and a `WH_MOUSE_LL` hook. The hook
//! callback runs on an OS-dictated context and only ever reads the shared
//! `ClickFilter`, which is atomics throughout.

use std::mem;
use std::sync::{Arc, OnceLock};

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    AttachThreadInput, GetFocus, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT,
    KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP, KEYEVENTF_UNICODE, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, GetForegroundWindow, GetWindowThreadProcessId, PostMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, HHOOK, WH_MOUSE_LL, WM_CHAR, WM_LBUTTONDBLCLK,
    WM_LBUTTONDOWN,
};

use super::{KeyEvent, MessagePost, PointerHook, SyntheticInput};
use crate::suppress::{ClickFilter, Verdict};

#[derive(Debug, Default)]
pub struct WindowsBackend;

impl WindowsBackend {
    pub fn new() -> Self {
        Self
    }
}

fn key_input(vk: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(vk),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn unicode_input(unit: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(0),
                wScan: unit,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

impl SyntheticInput for WindowsBackend {
    fn send(&mut self, batch: &[KeyEvent]) -> usize {
        let mut inputs = Vec::with_capacity(batch.len() * 2);
        // Raw INPUT count per record, so a short SendInput return can be
        // mapped back to whole records.
        let mut spans = Vec::with_capacity(batch.len());

        for event in batch {
            let before = inputs.len();
            match *event {
                KeyEvent::Down(vk) => inputs.push(key_input(vk.0, KEYBD_EVENT_FLAGS(0))),
                KeyEvent::Up(vk) => inputs.push(key_input(vk.0, KEYEVENTF_KEYUP)),
                KeyEvent::Unicode(ch) => {
                    let mut units = [0u16; 2];
                    for unit in ch.encode_utf16(&mut units) {
                        inputs.push(unicode_input(*unit, KEYEVENTF_UNICODE));
                        inputs.push(unicode_input(*unit, KEYEVENTF_UNICODE | KEYEVENTF_KEYUP));
                    }
                }
            }
            spans.push(inputs.len() - before);
        }

        let queued = unsafe { SendInput(&inputs, mem::size_of::<INPUT>() as i32) } as usize;

        let mut consumed = 0;
        let mut records = 0;
        for span in spans {
            if consumed + span > queued {
                break;
            }
            consumed += span;
            records += 1;
        }
        records
    }
}

impl MessagePost for WindowsBackend {
    fn post_char_to_focus(&mut self, ch: char) -> bool {
        unsafe {
            let foreground = GetForegroundWindow();
            if foreground.0.is_null() {
                return false;
            }

            let mut pid = 0u32;
            let foreground_thread = GetWindowThreadProcessId(foreground, Some(&mut pid));
            let current_thread = GetCurrentThreadId();

            // The focused control is only visible once our input state is
            // attached to the foreground thread.
            let attached = foreground_thread != current_thread
                && AttachThreadInput(current_thread, foreground_thread, true.into()).as_bool();

            let focused = GetFocus();
            let target = if focused.0.is_null() { foreground } else { focused };
            let posted =
                PostMessageW(Some(target), WM_CHAR, WPARAM(ch as usize), LPARAM(0)).is_ok();

            if attached {
                let _ = AttachThreadInput(current_thread, foreground_thread, false.into());
            }

            posted
        }
    }
}

/// Filter shared with the hook callback. Set once; the suppressor is a
/// per-process singleton and the filter's enabled flag does the gating.
static HOOK_FILTER: OnceLock<Arc<ClickFilter>> = OnceLock::new();

unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 {
        if let Some(filter) = HOOK_FILTER.get() {
            let suppress = match wparam.0 as u32 {
                WM_LBUTTONDOWN => filter.on_button_down() == Verdict::Suppress,
                WM_LBUTTONDBLCLK => filter.on_double_click() == Verdict::Suppress,
                _ => false,
            };
            if suppress {
                return LRESULT(1);
            }
        }
    }
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

#[derive(Debug, Default)]
pub struct WindowsPointerHook {
    hook: Option<HHOOK>,
}

impl WindowsPointerHook {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PointerHook for WindowsPointerHook {
    fn install(&mut self, filter: Arc<ClickFilter>) -> bool {
        if self.hook.is_some() {
            return true;
        }
        let _ = HOOK_FILTER.set(filter);

        match unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) } {
            Ok(hook) => {
                self.hook = Some(hook);
                true
            }
            Err(err) => {
                eprintln!("[HOOK] install denied: {err}");
                false
            }
        }
    }

    fn uninstall(&mut self) {
        if let Some(hook) = self.hook.take() {
            unsafe {
                let _ = UnhookWindowsHookEx(hook);
            }
        }
    }
}

impl Drop for WindowsPointerHook {
    fn drop(&mut self) {
        self.uninstall();
    }
}
