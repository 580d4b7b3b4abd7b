/// Available commands, argument parsing and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub usage: &'static str,
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "sholat",
    aliases: &["s", "kota"],
    usage: "sholat <keyword>",
    description: "Search prayer schedule locations",
  },
  Command {
    name: "jadwal",
    aliases: &["j"],
    usage: "jadwal [today|YYYY-MM|YYYY-MM-DD]",
    description: "Prayer schedule for the selected location",
  },
  Command {
    name: "today",
    aliases: &["t", "cal"],
    usage: "today",
    description: "Today's Hijri and Gregorian date",
  },
  Command {
    name: "ce",
    aliases: &["masehi"],
    usage: "ce <YYYY-MM-DD>",
    description: "Convert a Gregorian date to Hijri",
  },
  Command {
    name: "hijr",
    aliases: &["hijri"],
    usage: "hijr <YYYY-MM-DD>",
    description: "Convert a Hijri date to Gregorian",
  },
  Command {
    name: "quran",
    aliases: &["q"],
    usage: "quran",
    description: "List all surahs",
  },
  Command {
    name: "surah",
    aliases: &["su"],
    usage: "surah <number>",
    description: "Show a surah",
  },
  Command {
    name: "ayah",
    aliases: &["a", "ayat"],
    usage: "ayah <surah> <ayah>",
    description: "Show a single ayah",
  },
  Command {
    name: "random",
    aliases: &["r"],
    usage: "random",
    description: "Random hadith",
  },
  Command {
    name: "hadis",
    aliases: &["h", "hadith"],
    usage: "hadis <id>",
    description: "Show a hadith by id",
  },
  Command {
    name: "search",
    aliases: &["cari"],
    usage: "search <keyword>",
    description: "Search hadith text",
  },
  Command {
    name: "explore",
    aliases: &["e"],
    usage: "explore [page] [limit]",
    description: "Browse hadith page by page",
  },
  Command {
    name: "next",
    aliases: &["n"],
    usage: "next",
    description: "Next hadith",
  },
  Command {
    name: "prev",
    aliases: &["p"],
    usage: "prev",
    description: "Previous hadith",
  },
  Command {
    name: "perawi",
    aliases: &["rawi"],
    usage: "perawi <id>",
    description: "Show a narrator by id",
  },
  Command {
    name: "browse",
    aliases: &["b"],
    usage: "browse [page] [limit]",
    description: "Browse narrators page by page",
  },
  Command {
    name: "night",
    aliases: &["dark"],
    usage: "night",
    description: "Toggle night reading",
  },
  Command {
    name: "read",
    aliases: &["reading"],
    usage: "read",
    description: "Toggle reading mode",
  },
  Command {
    name: "quit",
    aliases: &["exit"],
    usage: "quit",
    description: "Exit myq",
  },
];

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  SearchLocations(String),
  Schedule(Option<String>),
  CalendarToday,
  FromGregorian(String),
  FromHijri(String),
  Surahs,
  Surah(String),
  Ayah { surah: String, ayah: String },
  RandomHadis,
  Hadis(String),
  SearchHadis(String),
  ExploreHadis { page: String, limit: String },
  NextHadis,
  PrevHadis,
  Perawi(String),
  BrowsePerawi { page: String, limit: String },
  ToggleNight,
  ToggleReading,
  Quit,
}

/// Find a command by exact name or alias
pub fn find(word: &str) -> Option<&'static Command> {
  let word = word.to_lowercase();
  COMMANDS
    .iter()
    .find(|cmd| cmd.name == word || cmd.aliases.contains(&word.as_str()))
}

/// Parse a command line into an action.
///
/// Errors are user-facing messages for the status bar.
pub fn parse(input: &str) -> Result<Action, String> {
  let mut words = input.split_whitespace();
  let Some(word) = words.next() else {
    return Err("Empty command".to_string());
  };
  let Some(cmd) = find(word) else {
    return Err(format!("Unknown command: {}", word));
  };
  let args: Vec<&str> = words.collect();
  let usage = || format!("Usage: {}", cmd.usage);

  // Free-text arguments keep their inner spacing collapsed to single spaces
  let rest = args.join(" ");
  let required = |value: String| if value.is_empty() { Err(usage()) } else { Ok(value) };
  let optional = |i: usize| args.get(i).map(|s| s.to_string()).unwrap_or_default();

  let action = match cmd.name {
    "sholat" => Action::SearchLocations(required(rest)?),
    "jadwal" => Action::Schedule(args.first().map(|s| s.to_string())),
    "today" => Action::CalendarToday,
    "ce" => Action::FromGregorian(required(rest)?),
    "hijr" => Action::FromHijri(required(rest)?),
    "quran" => Action::Surahs,
    "surah" => Action::Surah(required(optional(0))?),
    "ayah" => {
      let (surah, ayah) = match args.as_slice() {
        [pair] => pair.split_once(':').ok_or_else(usage)?,
        [surah, ayah, ..] => (*surah, *ayah),
        [] => return Err(usage()),
      };
      Action::Ayah {
        surah: required(surah.trim().to_string())?,
        ayah: required(ayah.trim().to_string())?,
      }
    }
    "random" => Action::RandomHadis,
    "hadis" => Action::Hadis(required(optional(0))?),
    "search" => Action::SearchHadis(required(rest)?),
    "explore" => Action::ExploreHadis {
      page: optional(0),
      limit: optional(1),
    },
    "next" => Action::NextHadis,
    "prev" => Action::PrevHadis,
    "perawi" => Action::Perawi(required(optional(0))?),
    "browse" => Action::BrowsePerawi {
      page: optional(0),
      limit: optional(1),
    },
    "night" => Action::ToggleNight,
    "read" => Action::ToggleReading,
    "quit" => Action::Quit,
    other => return Err(format!("Unknown command: {}", other)),
  };
  Ok(action)
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    // Exact match on name
    if cmd.name == input_lower {
      matches.push((cmd, 0)); // Highest priority
      continue;
    }

    // Exact match on alias
    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    // Prefix match on name
    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Prefix match on alias
    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    // Fuzzy match on name
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
    }
  }

  // Stable sort keeps table order within a priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("surah");
    assert_eq!(suggestions[0].name, "surah");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("h");
    assert_eq!(suggestions[0].name, "hadis");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("jad");
    assert_eq!(suggestions[0].name, "jadwal");
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("plor");
    assert_eq!(suggestions[0].name, "explore");
  }

  #[test]
  fn test_parse_keyword_commands() {
    assert_eq!(
      parse("sholat  kota   bandung"),
      Ok(Action::SearchLocations("kota bandung".to_string()))
    );
    assert_eq!(parse("SEARCH niat"), Ok(Action::SearchHadis("niat".to_string())));
    assert_eq!(parse("s jakarta"), Ok(Action::SearchLocations("jakarta".to_string())));
  }

  #[test]
  fn test_parse_required_argument_missing() {
    assert_eq!(parse("sholat"), Err("Usage: sholat <keyword>".to_string()));
    assert_eq!(parse("surah   "), Err("Usage: surah <number>".to_string()));
    assert_eq!(parse("perawi"), Err("Usage: perawi <id>".to_string()));
    assert_eq!(parse("ce"), Err("Usage: ce <YYYY-MM-DD>".to_string()));
  }

  #[test]
  fn test_parse_ayah_forms() {
    let expected = Action::Ayah {
      surah: "2".to_string(),
      ayah: "255".to_string(),
    };
    assert_eq!(parse("ayah 2 255"), Ok(expected.clone()));
    assert_eq!(parse("ayah 2:255"), Ok(expected));
    assert_eq!(parse("ayah 2"), Err("Usage: ayah <surah> <ayah>".to_string()));
    assert_eq!(parse("ayah 2:"), Err("Usage: ayah <surah> <ayah>".to_string()));
    assert_eq!(parse("ayah"), Err("Usage: ayah <surah> <ayah>".to_string()));
  }

  #[test]
  fn test_parse_optional_arguments() {
    assert_eq!(parse("jadwal"), Ok(Action::Schedule(None)));
    assert_eq!(parse("jadwal 2024-03"), Ok(Action::Schedule(Some("2024-03".to_string()))));
    assert_eq!(
      parse("explore"),
      Ok(Action::ExploreHadis {
        page: String::new(),
        limit: String::new()
      })
    );
    assert_eq!(
      parse("browse 3 20"),
      Ok(Action::BrowsePerawi {
        page: "3".to_string(),
        limit: "20".to_string()
      })
    );
  }

  #[test]
  fn test_parse_unknown_and_empty() {
    assert_eq!(parse("frobnicate"), Err("Unknown command: frobnicate".to_string()));
    assert_eq!(parse("   "), Err("Empty command".to_string()));
  }

  #[test]
  fn test_every_command_parses_or_explains() {
    for cmd in COMMANDS {
      match parse(cmd.name) {
        Ok(_) => {}
        Err(msg) => assert_eq!(msg, format!("Usage: {}", cmd.usage)),
      }
    }
  }
}
