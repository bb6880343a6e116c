use minish::executor::builtin::{Builtin, BuiltinContext, BuiltinRegistry};
use minish::io_adapters::MemWriter;
use minish::readline::PlainSource;
use minish::{Flow, Shell};
use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::time::{Duration, Instant};

fn shell_with(registry: BuiltinRegistry) -> (Shell, MemWriter, MemWriter) {
    let out = MemWriter::new();
    let err = MemWriter::new();
    let shell = Shell::with_io(registry, Box::new(out.clone()), Box::new(err.clone())).unwrap();
    (shell, out, err)
}

fn shell() -> (Shell, MemWriter, MemWriter) {
    shell_with(BuiltinRegistry::with_defaults())
}

fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}

#[test]
fn blank_lines_are_recorded_but_do_nothing() {
    let (mut shell, out, err) = shell();
    for line in ["\n", "   \t \n", "\x07\r\n"] {
        assert_eq!(shell.eval_line(line).unwrap(), Flow::Continue);
    }
    assert_eq!(shell.history().len(), 3);
    assert_eq!(out.contents(), "");
    assert_eq!(err.contents(), "");
}

#[test]
fn lone_ampersand_launches_nothing() {
    let (mut shell, out, _err) = shell();
    assert_eq!(shell.eval_line("&\n").unwrap(), Flow::Continue);
    assert_eq!(out.contents(), "");
    assert_eq!(shell.reaper().pending(), 0);
}

#[test]
fn exit_stops_with_any_arguments() {
    let (mut shell, _out, _err) = shell();
    assert_eq!(shell.eval_line("exit\n").unwrap(), Flow::Stop);
    assert_eq!(shell.eval_line("exit 1 2 3\n").unwrap(), Flow::Stop);
}

#[test]
fn loop_stops_at_exit_and_keeps_history() {
    let (mut shell, out, _err) = shell();
    let mut prompts = Vec::new();
    let mut source = PlainSource::new(&b"help\nhistory\nexit\nhelp\n"[..], &mut prompts);
    shell.run(&mut source).unwrap();
    drop(source);

    assert_eq!(shell.history().replay(), ["help\n", "history\n", "exit\n"]);
    let out = out.contents();
    assert_eq!(out.matches("The following functions are built in:").count(), 1);
    assert!(out.ends_with("help\nhistory\n"), "{out}");
    assert_eq!(prompts, b"> > > ");
}

#[test]
fn loop_ends_at_end_of_input() {
    let (mut shell, _out, _err) = shell();
    let mut source = PlainSource::new(&b"help\n   \n"[..], Vec::new());
    shell.run(&mut source).unwrap();
    assert_eq!(shell.history().len(), 2);
}

#[test]
fn unknown_program_is_reported_and_loop_continues() {
    let (mut shell, _out, err) = shell();
    let flow = shell.eval_line("minish-no-such-program-xyz arg\n").unwrap();
    assert_eq!(flow, Flow::Continue);
    assert!(
        err.contents().starts_with("minish: minish-no-such-program-xyz: "),
        "{}",
        err.contents()
    );
}

#[test]
fn foreground_command_blocks_until_exit() {
    let (mut shell, _out, _err) = shell();
    let started = Instant::now();
    assert_eq!(shell.eval_line("sleep 0.3\n").unwrap(), Flow::Continue);
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[test]
fn failing_command_still_continues() {
    let (mut shell, _out, _err) = shell();
    assert_eq!(shell.eval_line("false\n").unwrap(), Flow::Continue);
}

#[test]
fn background_command_returns_immediately_and_is_reaped() {
    let (mut shell, out, _err) = shell();
    let started = Instant::now();
    assert_eq!(shell.eval_line("sleep 30 &\n").unwrap(), Flow::Continue);
    assert!(started.elapsed() < Duration::from_secs(5));

    let out = out.contents();
    let pid: libc::pid_t = out
        .trim()
        .strip_prefix("Child PID is ")
        .and_then(|pid| pid.parse().ok())
        .unwrap_or_else(|| panic!("unexpected output {out:?}"));
    assert_eq!(shell.reaper().pending(), 1);

    unsafe { libc::kill(pid, libc::SIGTERM) };
    assert!(wait_for(|| shell.reaper().pending() == 0));
}

#[test]
fn pipeline_feeds_left_output_into_right_input() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.txt");
    let (mut shell, _out, err) = shell();

    let line = format!("echo hello pipe | tee {}\n", target.display());
    assert_eq!(shell.eval_line(&line).unwrap(), Flow::Continue);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "hello pipe\n");
    assert_eq!(err.contents(), "");
}

#[test]
fn pipeline_waits_for_both_stages() {
    let (mut shell, _out, _err) = shell();

    let started = Instant::now();
    shell.eval_line("sleep 0.3 | true\n").unwrap();
    assert!(started.elapsed() >= Duration::from_millis(300));

    let started = Instant::now();
    shell.eval_line("true | sleep 0.3\n").unwrap();
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[test]
fn pipeline_ignores_background_marker() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("bg.txt");
    let (mut shell, out, _err) = shell();

    let line = format!("echo waited | tee {} &\n", target.display());
    shell.eval_line(&line).unwrap();
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "waited\n");
    assert!(!out.contents().contains("Child PID"));
}

#[test]
fn pipeline_with_missing_side_is_usage_error() {
    for line in ["| wc\n", "ls |\n", "|\n"] {
        let (mut shell, _out, err) = shell();
        assert_eq!(shell.eval_line(line).unwrap(), Flow::Continue);
        assert_eq!(err.contents(), "minish: syntax error near unexpected token '|'\n");
    }
}

#[test]
fn pipeline_with_unknown_left_spawns_nothing() {
    let (mut shell, _out, err) = shell();
    shell.eval_line("minish-no-such-program-xyz | cat\n").unwrap();
    assert!(err.contents().starts_with("minish: minish-no-such-program-xyz: "));
}

#[test]
fn cd_changes_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let before = std::env::current_dir().unwrap();
    let (mut shell, _out, err) = shell();

    shell.eval_line("cd\n").unwrap();
    assert_eq!(std::env::current_dir().unwrap(), before);
    assert_eq!(err.contents(), "minish: expected argument to \"cd\"\n");

    let line = format!("cd {}\n", dir.path().display());
    assert_eq!(shell.eval_line(&line).unwrap(), Flow::Continue);
    assert_eq!(
        std::env::current_dir().unwrap().canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );

    std::env::set_current_dir(before).unwrap();
}

struct Counting {
    calls: Rc<Cell<usize>>,
}

impl Builtin for Counting {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn run(&self, args: &[&str], ctx: &mut BuiltinContext<'_>) -> minish::Result<Flow> {
        self.calls.set(self.calls.get() + 1);
        writeln!(ctx.out, "{}", args.join(","))?;
        Ok(Flow::Continue)
    }
}

#[test]
fn registered_builtin_shadows_external_program() {
    let calls = Rc::new(Cell::new(0));
    let mut registry = BuiltinRegistry::with_defaults();
    registry
        .register(Box::new(Counting { calls: Rc::clone(&calls) }))
        .unwrap();
    let (mut shell, out, _err) = shell_with(registry);

    shell.eval_line("ls -l  /tmp\n").unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(out.contents(), "ls,-l,/tmp\n");

    shell.eval_line("help\n").unwrap();
    assert!(out.contents().contains("  ls\n"));
}

/// Keeps everything written, but refuses to flush it.
struct StuckOutput {
    inner: MemWriter,
    unflushed: bool,
}

impl Write for StuckOutput {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.unflushed |= !data.is_empty();
        self.inner.write(data)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if self.unflushed {
            return Err(std::io::ErrorKind::BrokenPipe.into());
        }
        Ok(())
    }
}

struct BrokenOutput;

impl Write for BrokenOutput {
    fn write(&mut self, _data: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn background_child_is_adopted_even_when_output_fails() {
    let captured = MemWriter::new();
    let out = StuckOutput { inner: captured.clone(), unflushed: false };
    let mut shell = Shell::with_io(
        BuiltinRegistry::with_defaults(),
        Box::new(out),
        Box::new(MemWriter::new()),
    )
    .unwrap();

    assert!(shell.eval_line("sleep 30 &\n").is_err());
    assert_eq!(shell.reaper().pending(), 1);

    let text = captured.contents();
    let pid: libc::pid_t = text
        .trim()
        .strip_prefix("Child PID is ")
        .and_then(|pid| pid.parse().ok())
        .unwrap_or_else(|| panic!("unexpected output {text:?}"));
    unsafe { libc::kill(pid, libc::SIGTERM) };
    assert!(wait_for(|| shell.reaper().pending() == 0));
}

#[test]
fn pipeline_waits_for_left_stage_when_error_report_fails() {
    let mut shell = Shell::with_io(
        BuiltinRegistry::with_defaults(),
        Box::new(MemWriter::new()),
        Box::new(BrokenOutput),
    )
    .unwrap();

    let started = Instant::now();
    assert!(shell.eval_line("sleep 0.3 | minish-no-such-program-xyz\n").is_err());
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[test]
fn stopped_foreground_child_is_waited_on_until_it_exits() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("pid");
    let script = dir.path().join("stoppable.sh");
    std::fs::write(
        &script,
        format!("echo $$ > {}.tmp\nmv {0}.tmp {0}\nexec sleep 1\n", pid_file.display()),
    )
    .unwrap();

    let signaller = std::thread::spawn({
        let pid_file = pid_file.clone();
        move || {
            let mut pid = None;
            let found = wait_for(|| {
                pid = std::fs::read_to_string(&pid_file)
                    .ok()
                    .and_then(|s| s.trim().parse::<libc::pid_t>().ok());
                pid.is_some()
            });
            assert!(found, "child never wrote its pid");
            let pid = pid.unwrap();
            unsafe { libc::kill(pid, libc::SIGSTOP) };
            std::thread::sleep(Duration::from_millis(1500));
            unsafe { libc::kill(pid, libc::SIGCONT) };
            pid
        }
    });

    let (mut shell, _out, _err) = shell();
    let started = Instant::now();
    let line = format!("sh {}\n", script.display());
    assert_eq!(shell.eval_line(&line).unwrap(), Flow::Continue);
    let elapsed = started.elapsed();

    let pid = signaller.join().unwrap();
    assert!(elapsed >= Duration::from_millis(1500), "returned after {elapsed:?}");
    let mut status = 0;
    assert_eq!(unsafe { libc::waitpid(pid, &mut status, libc::WNOHANG) }, -1);
}
