// ABOUTME: collects the host facts interpolated into every prompt, once at startup.
// ABOUTME: each fact degrades to "unknown" on its own instead of failing startup.

use std::ffi::CStr;

use llm_term_common::SystemFacts;
use tracing::debug;

const UNKNOWN: &str = "unknown";
const OS_RELEASE_PATH: &str = "/etc/os-release";

pub fn gather() -> SystemFacts {
    let uts = uname();
    let os = std::fs::read_to_string(OS_RELEASE_PATH)
        .ok()
        .and_then(|text| pretty_name(&text))
        .or_else(|| uts.as_ref().map(|u| format!("{} {} {}", u.sysname, u.release, u.machine)))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let facts = SystemFacts {
        user: username().unwrap_or_else(|| UNKNOWN.to_string()),
        hostname: hostname().unwrap_or_else(|| UNKNOWN.to_string()),
        os,
        kernel: uts.map(|u| u.release).unwrap_or_else(|| UNKNOWN.to_string()),
        cwd: std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| UNKNOWN.to_string()),
    };
    debug!(?facts, "gathered system facts");
    facts
}

/// Extracts `PRETTY_NAME` from os-release contents, unquoting it.
fn pretty_name(os_release: &str) -> Option<String> {
    os_release.lines().find_map(|line| {
        let value = line.trim().strip_prefix("PRETTY_NAME=")?;
        let value = value.trim_matches(|c| c == '"' || c == '\'');
        (!value.is_empty()).then(|| value.to_string())
    })
}

struct Uname {
    sysname: String,
    release: String,
    machine: String,
}

fn uname() -> Option<Uname> {
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::uname(&mut uts) };
    if rc != 0 {
        return None;
    }

    let field = |raw: &[libc::c_char]| unsafe { CStr::from_ptr(raw.as_ptr()) }.to_string_lossy().into_owned();
    Some(Uname {
        sysname: field(&uts.sysname),
        release: field(&uts.release),
        machine: field(&uts.machine),
    })
}

fn hostname() -> Option<String> {
    let mut buf = [0 as libc::c_char; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr(), buf.len() - 1) };
    if rc != 0 {
        return None;
    }
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Some(name.to_string_lossy().into_owned())
}

fn username() -> Option<String> {
    let uid = unsafe { libc::geteuid() };
    let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
    let mut buf = vec![0 as libc::c_char; 4096];
    let mut result: *mut libc::passwd = std::ptr::null_mut();

    let rc = unsafe { libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut result) };
    if rc == 0 && !result.is_null() && !pwd.pw_name.is_null() {
        let name = unsafe { CStr::from_ptr(pwd.pw_name) };
        return Some(name.to_string_lossy().into_owned());
    }

    std::env::var("USER").or_else(|_| std::env::var("LOGNAME")).ok()
}
