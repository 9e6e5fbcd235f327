//! # Help Text
//!
//! Built from the configured command names, since those are not fixed literals.

use crate::domain::config::CommandsConfig;

pub fn main(commands: &CommandsConfig) -> String {
    let p = &commands.prefix;
    format!(
        "**Balance Watch**\n\n\
         `{p}{add}` register a user and wallet (or update an existing one)\n\
         `{p}{erase}` remove a user\n\
         `{p}{check}` fetch every wallet and store the new balances\n\
         `{p}{sum}` user count and total stored balance\n\
         `{p}{list}` fetch every wallet and show the change since the last listing\n\
         `{p}{help}` this message",
        add = commands.add,
        erase = commands.erase,
        check = commands.check,
        sum = commands.sum,
        list = commands.list,
        help = commands.help,
    )
}
