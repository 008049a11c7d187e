//! Ownership and permission bits, where the platform exposes them.

use std::fs::Metadata;

#[cfg(unix)]
pub fn describe(metadata: &Metadata) -> Option<String> {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode();
    Some(format!("{:04o} ({})", mode & 0o7777, format_unix_permissions(mode)))
}

#[cfg(not(unix))]
pub fn describe(_metadata: &Metadata) -> Option<String> {
    None
}

#[cfg(unix)]
pub fn owner_name(metadata: &Metadata) -> Option<String> {
    use std::os::unix::fs::MetadataExt;
    use users::get_user_by_uid;

    get_user_by_uid(metadata.uid()).map(|user| user.name().to_string_lossy().into_owned())
}

#[cfg(not(unix))]
pub fn owner_name(_metadata: &Metadata) -> Option<String> {
    None
}

#[cfg(unix)]
pub fn group_name(metadata: &Metadata) -> Option<String> {
    use std::os::unix::fs::MetadataExt;
    use users::get_group_by_gid;

    get_group_by_gid(metadata.gid()).map(|group| group.name().to_string_lossy().into_owned())
}

#[cfg(not(unix))]
pub fn group_name(_metadata: &Metadata) -> Option<String> {
    None
}

#[cfg(unix)]
fn format_unix_permissions(mode: u32) -> String {
    const SYMBOLS: [&str; 8] = ["---", "--x", "-w-", "-wx", "r--", "r-x", "rw-", "rwx"];

    let user = SYMBOLS[((mode >> 6) & 0o7) as usize];
    let group = SYMBOLS[((mode >> 3) & 0o7) as usize];
    let other = SYMBOLS[(mode & 0o7) as usize];

    format!("{user}{group}{other}")
}
