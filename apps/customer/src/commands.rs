//! # Text Front End Commands
//!
//! One command per input line:
//!
//! | Command           | Action                                    |
//! |-------------------|-------------------------------------------|
//! | `check <n>`       | show product `n` in an emptied basket     |
//! | `search <text>`   | look products up by description           |
//! | `verify <n>`      | confirm product `n` for buy / remove      |
//! | `buy`             | buy one unit of the confirmed product     |
//! | `remove`          | return one unit of the confirmed product  |
//! | `reserve`         | place the basket as an order              |
//! | `clear`           | empty the basket                          |
//! | `basket`          | print the basket                          |
//! | `help`            | print this list                           |
//! | `quit`            | leave                                     |

use std::fmt::Write as _;
use std::str::FromStr;

use kiosk_core::Basket;

use crate::error::{AppError, AppResult};
use crate::state::{KioskConfig, Session};

pub const HELP: &str = "\
Commands:
  check <number>    Show a product and its stock level
  search <text>     Find products by description
  verify <number>   Confirm a product before buying or removing it
  buy               Buy one of the confirmed product
  remove            Put one of the confirmed product back
  reserve           Place the basket as an order
  clear             Empty the basket
  basket            Show the basket
  help              Show this list
  quit              Leave";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Check(String),
    Search(String),
    Verify(String),
    Buy,
    Remove,
    Reserve,
    Clear,
    Basket,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> AppResult<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "check" | "c" => Ok(Command::Check(argument(rest, "check <number>")?)),
            "search" | "s" => Ok(Command::Search(argument(rest, "search <text>")?)),
            "verify" | "v" => Ok(Command::Verify(argument(rest, "verify <number>")?)),
            "buy" | "b" => Ok(Command::Buy),
            "remove" | "r" => Ok(Command::Remove),
            "reserve" => Ok(Command::Reserve),
            "clear" => Ok(Command::Clear),
            "basket" => Ok(Command::Basket),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err(AppError::validation("Empty command")),
            other => Err(AppError::validation(format!(
                "Unknown command '{}', type 'help' for a list",
                other
            ))),
        }
    }
}

fn argument(rest: &str, usage: &str) -> AppResult<String> {
    if rest.is_empty() {
        return Err(AppError::validation(format!("Usage: {}", usage)));
    }
    Ok(rest.to_string())
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this and read the next line.
    Reply(String),
    Quit,
}

/// Runs one command against the session's controller.
pub async fn execute(session: &Session, command: Command) -> Outcome {
    let controller = session.controller();

    let (event, show_picture) = match command {
        Command::Check(pn) => (controller.check(&pn).await, true),
        Command::Search(text) => (controller.search(&text).await, true),
        Command::Verify(pn) => (controller.verify(&pn).await, false),
        Command::Buy => (controller.buy().await, false),
        Command::Remove => (controller.remove().await, false),
        Command::Reserve => (controller.reserve().await, false),
        Command::Clear => (controller.clear().await, false),
        Command::Basket => {
            let basket = controller.basket().await;
            return Outcome::Reply(render_basket(session.config(), basket.as_ref()));
        }
        Command::Help => return Outcome::Reply(HELP.to_string()),
        Command::Quit => return Outcome::Quit,
    };

    let mut reply = event.to_string();
    if show_picture {
        if let Some(picture) = controller.picture().await {
            let path = session.config().picture_path(&picture);
            let _ = write!(reply, "\nPicture: {}", path.display());
        }
    }

    Outcome::Reply(reply)
}

/// Basket listing with a store header and the amount due.
pub fn render_basket(config: &KioskConfig, basket: Option<&Basket>) -> String {
    let Some(basket) = basket.filter(|b| !b.is_empty()) else {
        return "Basket is empty".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", config.store_name);
    out.push_str(&basket.to_string());
    let _ = write!(out, "Amount due: {}", config.format_price(basket.total()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_core::{Product, StockReadWriter};
    use kiosk_db::{Database, DbConfig};

    async fn session() -> Session {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stock = db.stock();
        stock
            .modify_stock(&Product::new("0001", "40 inch LED HD TV", 26900, 90))
            .await
            .unwrap();
        stock
            .modify_stock(&Product::new("0007", "32Gb USB2 drive", 699, 1))
            .await
            .unwrap();
        stock.set_picture("0001", "pic0001.jpg").await.unwrap();

        Session::with_database(KioskConfig::default(), db)
    }

    async fn reply(session: &Session, line: &str) -> String {
        match execute(session, line.parse().unwrap()).await {
            Outcome::Reply(text) => text,
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("check 0001".parse::<Command>().unwrap(), Command::Check("0001".into()));
        assert_eq!(
            "search  led tv ".parse::<Command>().unwrap(),
            Command::Search("led tv".into())
        );
        assert_eq!("V 0002".parse::<Command>().unwrap(), Command::Verify("0002".into()));
        assert_eq!("buy".parse::<Command>().unwrap(), Command::Buy);
        assert_eq!(" quit ".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        let err = "check".parse::<Command>().unwrap_err();
        assert_eq!(err.message, "Usage: check <number>");

        let err = "dance".parse::<Command>().unwrap_err();
        assert!(err.message.starts_with("Unknown command 'dance'"));

        assert!("   ".parse::<Command>().is_err());
    }

    #[test]
    fn test_render_empty_basket() {
        let config = KioskConfig::default();
        assert_eq!(render_basket(&config, None), "Basket is empty");
        assert_eq!(render_basket(&config, Some(&Basket::new())), "Basket is empty");
    }

    #[tokio::test]
    async fn test_check_shows_picture() {
        let session = session().await;
        let text = reply(&session, "check 0001").await;
        assert_eq!(
            text,
            "40 inch LED HD TV :  269.00 (90) \nPicture: images/pic0001.jpg"
        );

        let text = reply(&session, "check 0007").await;
        assert!(text.ends_with("Picture: images/default.jpg"));
    }

    #[tokio::test]
    async fn test_full_customer_flow() {
        let session = session().await;

        assert_eq!(reply(&session, "buy").await, "Check if OK with customer first");

        reply(&session, "verify 0007").await;
        assert_eq!(reply(&session, "buy").await, "Purchased 32Gb USB2 drive");

        // Last unit is gone
        reply(&session, "verify 0007").await;
        assert_eq!(
            reply(&session, "verify 0007").await,
            "32Gb USB2 drive not in stock"
        );

        let basket = reply(&session, "basket").await;
        assert!(basket.contains("32Gb USB2 drive"));
        assert!(basket.ends_with("Amount due: £6.99"));

        assert_eq!(reply(&session, "reserve").await, "Next customer");
        assert_eq!(reply(&session, "basket").await, "Basket is empty");

        let orders = session.database().orders();
        let waiting = orders.waiting_orders().await.unwrap();
        assert_eq!(waiting.len(), 1);

        let order = orders.get_order(waiting[0]).await.unwrap().unwrap();
        assert_eq!(order.lines, vec![Product::new("0007", "32Gb USB2 drive", 699, 1)]);
    }

    #[tokio::test]
    async fn test_remove_puts_stock_back() {
        let session = session().await;
        reply(&session, "verify 0007").await;
        reply(&session, "buy").await;
        reply(&session, "verify 0007").await;

        // Verify failed (no stock left), so remove is refused
        assert_eq!(
            reply(&session, "remove").await,
            "No item to remove or item cannot be removed"
        );

        session.database().stock().add_stock("0007", 1).await.unwrap();
        reply(&session, "verify 0007").await;
        assert_eq!(
            reply(&session, "remove").await,
            "Removed 32Gb USB2 drive from the basket"
        );

        let level = session.database().stock().find_by_number("0007").await.unwrap().unwrap();
        assert_eq!(level.quantity, 2);
    }

    #[tokio::test]
    async fn test_help_and_quit() {
        let session = session().await;
        assert_eq!(reply(&session, "help").await, HELP);
        assert_eq!(execute(&session, Command::Quit).await, Outcome::Quit);
    }
}
