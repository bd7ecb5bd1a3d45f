use std::ffi::OsString;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::Path;

use crate::cli::ParsedInvocation;
use crate::config::RuntimeOptions;
use crate::path::ResolvedMount;

/// Program and arguments handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Builds the `docker run` call.
    ///
    /// docker run --rm -i [-t] \
    ///  -v $host:$container \
    ///  -w $container \
    ///  [config args] [forwarded options] \
    ///  $image [command]
    ///
    /// Only the synthesized options go first; forwarded options and the
    /// command keep their order.
    pub fn build(
        parsed: &ParsedInvocation,
        mount: &ResolvedMount,
        options: &RuntimeOptions,
        tty: bool,
    ) -> Self {
        let (program, mut args) = if options.sudo {
            ("sudo".to_string(), vec![OsString::from(&options.runtime)])
        } else {
            (options.runtime.clone(), Vec::new())
        };

        args.extend(["run", "--rm", "-i"].map(OsString::from));
        if tty {
            args.push("-t".into());
        }
        args.extend(mount_declaration(mount));
        args.extend([
            "-w".into(),
            mount.container_path.as_os_str().to_os_string(),
        ]);
        args.extend(options.extra_args.iter().map(OsString::from));
        args.extend(parsed.forwarded_flags.iter().cloned());
        args.push(parsed.image.clone());
        args.extend(parsed.command.iter().cloned());

        Self { program, args }
    }
}

/// `-v host:container`, or `--mount` when a path contains ':' since `-v`
/// has no way to escape it.
fn mount_declaration(mount: &ResolvedMount) -> [OsString; 2] {
    let host = mount.host_path.as_os_str().as_bytes();
    let container = mount.container_path.as_os_str().as_bytes();

    if !host.contains(&b':') && !container.contains(&b':') {
        let mut volume = mount.host_path.as_os_str().to_os_string();
        volume.push(":");
        volume.push(mount.container_path.as_os_str());
        return ["-v".into(), volume];
    }

    let mut spec = b"type=bind,".to_vec();
    spec.extend(csv_field("source", &mount.host_path));
    spec.push(b',');
    spec.extend(csv_field("target", &mount.container_path));
    ["--mount".into(), OsString::from_vec(spec)]
}

// --mount is parsed as one CSV record
fn csv_field(key: &str, path: &Path) -> Vec<u8> {
    let mut field = format!("{}=", key).into_bytes();
    field.extend_from_slice(path.as_os_str().as_bytes());
    if !field.iter().any(|b| matches!(b, b',' | b'"' | b'\n' | b'\r')) {
        return field;
    }

    let mut quoted = vec![b'"'];
    for &b in &field {
        if b == b'"' {
            quoted.push(b'"');
        }
        quoted.push(b);
    }
    quoted.push(b'"');
    quoted
}
