use anyhow::{bail, Result};
use pico_args::Arguments;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add { title: String, body: String },
    Edit { id: String, title: String, body: String },
    Delete { id: String },
    Show { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub url: Option<String>,
    pub command: Command,
}

impl Args {
    pub const HELP_STRING: &str = r#"
usage: posts [options] <command>

commands:
    list                        fetch and print all posts
    add <title> <body>          create a post
    edit <id> <title> <body>    replace a post's title and body
    delete <id>                 delete a post
    show <id>                   print one post in full

options:
    -u --url <base url>         API base url, overrides POSTS_API_URL
                                default: http://127.0.0.1:3000
    -h --help                   print this help
"#;

    pub fn from_env() -> Self {
        let pargs = Arguments::from_env();
        match Self::try_from_args(pargs) {
            Ok(Some(args)) => args,
            Ok(None) => {
                print!("{}", Self::HELP_STRING);
                std::process::exit(0);
            }
            Err(error) => {
                eprint!("error: {error}{}", Self::HELP_STRING);
                std::process::exit(2);
            }
        }
    }

    /// `None` when help was requested.
    pub fn try_from_args(mut pargs: Arguments) -> Result<Option<Self>> {
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let url = pargs.opt_value_from_str(["-u", "--url"])?;
        let subcommand = pargs.subcommand()?;

        let command = match subcommand.as_deref() {
            Some("list") => Command::List,
            Some("add") => Command::Add {
                title: pargs.free_from_str()?,
                body: pargs.free_from_str()?,
            },
            Some("edit") => Command::Edit {
                id: pargs.free_from_str()?,
                title: pargs.free_from_str()?,
                body: pargs.free_from_str()?,
            },
            Some("delete") => Command::Delete {
                id: pargs.free_from_str()?,
            },
            Some("show") => Command::Show {
                id: pargs.free_from_str()?,
            },
            Some(other) => bail!("unknown command `{other}`"),
            None => bail!("missing command"),
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            bail!("unexpected arguments: {remaining:?}");
        }

        Ok(Some(Self { url, command }))
    }
}
