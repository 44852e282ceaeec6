//! Instruction and register reference data.
//!
//! Both tables are semicolon-separated text, one entry per line:
//!
//! ```text
//! instructions.csv:  name;format;description;flags;pseudo
//! registers.csv:     name;description;alias,alias
//! ```
//!
//! A copy of each table ships inside the crate and backs
//! [`Catalog::builtin`].

use crate::error::{P4Error, Result};
use std::collections::HashMap;

/// File name of the instruction table inside a documentation directory.
pub const INSTRUCTIONS_FILE: &str = "instructions.csv";

/// File name of the register table inside a documentation directory.
pub const REGISTERS_FILE: &str = "registers.csv";

const BUILTIN_INSTRUCTIONS: &str = include_str!("../data/instructions.csv");
const BUILTIN_REGISTERS: &str = include_str!("../data/registers.csv");

/// Flags an instruction may affect, in display order.
const FLAGS: [char; 5] = ['Z', 'C', 'N', 'O', 'E'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDoc {
    pub name: String,
    pub format: String,
    pub description: String,
    /// Affected flags drawn from `ZCNOE`, in that order.
    pub flags: String,
    /// Assembler directive rather than a machine instruction.
    pub pseudo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDoc {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
}

/// Documentation lookup tables keyed by upper-case name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    instructions: HashMap<String, InstructionDoc>,
    registers: Vec<RegisterDoc>,
    register_names: HashMap<String, usize>,
}

impl Catalog {
    /// Parses the instruction and register tables.
    ///
    /// # Errors
    ///
    /// Returns [`P4Error::Catalog`] for a row with too few fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use p4_core::catalog::Catalog;
    ///
    /// let catalog = Catalog::parse(
    ///     "nop;NOP;Does nothing.;;false\n",
    ///     "R14;Stack pointer.;SP\n",
    /// )
    /// .unwrap();
    /// assert_eq!(catalog.instruction("NOP").unwrap().format, "NOP");
    /// assert_eq!(catalog.register("sp").unwrap().name, "R14");
    /// ```
    pub fn parse(instructions: &str, registers: &str) -> Result<Self> {
        let mut catalog = Self::default();

        for (line, fields) in rows(instructions) {
            let [name, format, description, flags, pseudo] =
                take_fields::<5>(fields, INSTRUCTIONS_FILE, line)?;
            let flags = flags.to_uppercase();
            let doc = InstructionDoc {
                name: name.to_uppercase(),
                format: format.to_string(),
                description: description.to_string(),
                flags: FLAGS.iter().filter(|f| flags.contains(**f)).collect(),
                pseudo: pseudo.trim().eq_ignore_ascii_case("true"),
            };
            catalog.instructions.insert(doc.name.clone(), doc);
        }

        for (line, fields) in rows(registers) {
            let [name, description, aliases] = take_fields::<3>(fields, REGISTERS_FILE, line)?;
            let doc = RegisterDoc {
                name: name.to_uppercase(),
                description: description.to_string(),
                aliases: aliases
                    .split(',')
                    .map(str::trim)
                    .filter(|alias| !alias.is_empty())
                    .map(str::to_uppercase)
                    .collect(),
            };

            let position = catalog.registers.len();
            for alias in &doc.aliases {
                catalog.register_names.insert(alias.clone(), position);
            }
            catalog.register_names.insert(doc.name.clone(), position);
            catalog.registers.push(doc);
        }

        tracing::debug!(
            "parsed documentation catalog: {} instructions, {} registers",
            catalog.instructions.len(),
            catalog.registers.len()
        );

        Ok(catalog)
    }

    /// Catalog built from the tables bundled with the crate.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_INSTRUCTIONS, BUILTIN_REGISTERS).unwrap_or_else(|e| {
            tracing::error!("bundled documentation is invalid: {}", e);
            Self::default()
        })
    }

    /// Looks up an instruction or directive; case-insensitive.
    pub fn instruction(&self, name: &str) -> Option<&InstructionDoc> {
        self.instructions.get(&name.to_uppercase())
    }

    /// Looks up a register by name or alias; case-insensitive.
    pub fn register(&self, name: &str) -> Option<&RegisterDoc> {
        self.register_names
            .get(&name.to_uppercase())
            .map(|&i| &self.registers[i])
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    pub fn register_count(&self) -> usize {
        self.registers.len()
    }
}

/// Non-empty lines with their 1-based line numbers, split on `;`.
fn rows(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line.split(';').collect()))
}

fn take_fields<'a, const N: usize>(
    fields: Vec<&'a str>,
    source_name: &str,
    line: usize,
) -> Result<[&'a str; N]> {
    let found = fields.len();
    if found < N {
        return Err(P4Error::Catalog {
            source_name: source_name.to_string(),
            line,
            reason: format!("expected {N} fields, found {found}"),
        });
    }

    let mut taken = [""; N];
    for (slot, field) in taken.iter_mut().zip(fields) {
        *slot = field;
    }
    Ok(taken)
}
