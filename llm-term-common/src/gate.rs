// ABOUTME: refuses candidate commands that contain a known-destructive idiom.
// ABOUTME: the denylist table below is the whole security surface and must stay reviewable.

/// Lowercase substrings that mark a command as forbidden wherever they appear.
///
/// Matching is plain substring containment over the whole command, so
/// `rm -rf /tmp/x` is refused because it contains `rm -rf /`, and `asphalt`
/// is refused because it contains `halt`. That over-blocking is accepted.
pub const DENYLIST: &[&str] = &[
    // filesystem wipes
    "rm -rf /",
    "rm -rf *",
    "rm -rf ~",
    "rm -rf $home",
    "mkfs",
    // fork bomb
    ":(){:|:&};:",
    // raw device and system file writes
    "dd if=",
    "dd of=",
    ">/dev/",
    "> /dev/",
    "> /etc/",
    // permissions
    "chmod 777 /",
    "chown root",
    // power state
    "reboot",
    "poweroff",
    "halt",
    "shutdown",
    "init 0",
    // root escalation
    "sudo rm",
    "sudo -s",
    "sudo su",
    "sudo bash",
    "sudo sh",
];

/// Returns the first denylist pattern contained in `command`, if any.
pub fn matched_pattern(command: &str) -> Option<&'static str> {
    let candidate = command.trim().to_lowercase();
    DENYLIST.iter().copied().find(|p| candidate.contains(p))
}

pub fn is_forbidden(command: &str) -> bool {
    matched_pattern(command).is_some()
}
