//! Process exit codes, borrowed from `sysexits.h`.

/// Exit codes reported by the driver and the REPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    Usage = 64,
    DataErr = 65,
    NoInput = 66,
    NoUser = 67,
    NoHost = 68,
    Unavailable = 69,
    Software = 70,
    OsErr = 71,
    OsFile = 72,
    CantCreat = 73,
    IoErr = 74,
    TempFail = 75,
    Protocol = 76,
    NoPerm = 77,
    Config = 78,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            ExitCode::Ok => "ok",
            ExitCode::Usage => "command line usage error",
            ExitCode::DataErr => "data format error",
            ExitCode::NoInput => "cannot open input",
            ExitCode::NoUser => "addressee unknown",
            ExitCode::NoHost => "host name unknown",
            ExitCode::Unavailable => "service unavailable",
            ExitCode::Software => "internal software error",
            ExitCode::OsErr => "system error (e.g., can't fork)",
            ExitCode::OsFile => "critical OS file missing",
            ExitCode::CantCreat => "can't create (user) output file",
            ExitCode::IoErr => "input/output error",
            ExitCode::TempFail => "temp failure; user is invited to retry",
            ExitCode::Protocol => "remote error in protocol",
            ExitCode::NoPerm => "permission denied",
            ExitCode::Config => "configuration error",
        }
    }
}
