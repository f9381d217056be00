pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# EVENTMAIL CONFIGURATION
# =============================================================================
# eventmail sends operating-system event-log entries recorded since the last
# run to an operator by email. It is meant to be started by a scheduler, e.g.
# a Task Scheduler task attached to an event in Event Viewer.
#
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. ~/.config/eventmail/config.yml
#   3. /etc/eventmail/config.yml
#
# Any value may be read from an environment variable, e.g.
# password: $env{...} with the variable name inside the braces.

# =============================================================================
# SOURCE
# =============================================================================
# Critical, Error and Warning events (levels 1-3) are queried from this log.
# List available logs with 'wevtutil el'.

source:
  tool: wevtutil
  logger: System

# =============================================================================
# CHECKPOINT
# =============================================================================
# Holds the timestamp of the newest event already mailed. Without it, the
# last 10 matching events are sent.

checkpoint:
  path: ~/.local/share/eventmail/timestamp.txt

# =============================================================================
# MAIL
# =============================================================================
# SMTP submission with STARTTLS. For Gmail, create an app password instead of
# using the account password.

mail:
  host: smtp.gmail.com
  port: 587
  username: your_email@gmail.com
  password: $env{EVENTMAIL_PASSWORD}
  # Defaults to username
  # from: your_email@gmail.com
  to: your_email@gmail.com
  # {host} is replaced with this machine's host name
  subject: "Mail from eventmail on {host}"
  # null waits on the relay indefinitely
  timeout: 60s
"#
    .to_string()
}
