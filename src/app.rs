//! Interactive shell state and menu loop

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::catalog::{CatalogManager, OperationOutcome};
use crate::core::document::DocumentRecord;
use crate::ui::catalog_view::CatalogView;
use crate::ui::menu::{MainMenu, MenuAction};
use crate::ui::prompt::Prompter;

/// Main application state
pub struct DocshelfApp<R, W> {
    /// Catalog over the configured storage root
    catalog: CatalogManager,
    /// Operator I/O
    prompter: Prompter<R, W>,
    /// Most recent listing, used to resolve item numbers
    listing: Vec<DocumentRecord>,
}

impl<R: BufRead, W: Write> DocshelfApp<R, W> {
    /// Create a new application instance
    pub fn new(catalog: CatalogManager, input: R, output: W) -> Self {
        Self {
            catalog,
            prompter: Prompter::new(input, output),
            listing: Vec::new(),
        }
    }

    /// Run the menu loop until the operator exits or input ends
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("Opened storage root {}", self.catalog.root().display());
        self.refresh_listing()?;

        loop {
            MainMenu::show(self.prompter.output())?;
            let Some(choice) = self.prompter.ask("Choose an option")? else {
                break;
            };

            match MenuAction::parse(&choice) {
                Some(MenuAction::List) => self.refresh_listing()?,
                Some(MenuAction::Add) => self.add_document()?,
                Some(MenuAction::Rename) => self.rename_document()?,
                Some(MenuAction::Remove) => self.remove_document()?,
                Some(MenuAction::Exit) => break,
                None => writeln!(self.prompter.output(), "Invalid option: {}", choice)?,
            }
        }

        writeln!(self.prompter.output(), "Goodbye.")?;
        Ok(())
    }

    /// Re-list the catalog and print it
    fn refresh_listing(&mut self) -> Result<()> {
        self.listing = self.catalog.list_documents();
        CatalogView::show(self.prompter.output(), self.catalog.root(), &self.listing)
            .context("Failed to print catalog")
    }

    fn add_document(&mut self) -> Result<()> {
        let Some(source) = self.prompter.ask("Path of the file to add")? else {
            return Ok(());
        };
        if source.is_empty() {
            return Ok(());
        }

        let outcome = OperationOutcome::from_result(
            self.catalog.add_document(Path::new(&source)),
            |relative| format!("Added {}", relative.display()),
        );
        self.finish(outcome)
    }

    fn rename_document(&mut self) -> Result<()> {
        let Some(target) = self.select_document("Document to rename")? else {
            return Ok(());
        };
        let Some(new_stem) = self.prompter.ask("New name (without extension)")? else {
            return Ok(());
        };

        let outcome = OperationOutcome::from_result(
            self.catalog.rename_document(&target, &new_stem),
            |relative| format!("Renamed {} to {}", target.display(), relative.display()),
        );
        self.finish(outcome)
    }

    fn remove_document(&mut self) -> Result<()> {
        let Some(target) = self.select_document("Document to remove")? else {
            return Ok(());
        };
        if !self
            .prompter
            .confirm(&format!("Remove {}?", target.display()))?
        {
            writeln!(self.prompter.output(), "Cancelled.")?;
            return Ok(());
        }

        let outcome = OperationOutcome::from_result(
            self.catalog.remove_document(&target),
            |relative| format!("Removed {}", relative.display()),
        );
        self.finish(outcome)
    }

    /// Pick a document from the last listing by number.
    ///
    /// The listing may be stale by now; the catalog reports a vanished file
    /// when the operation runs.
    fn select_document(&mut self, label: &str) -> Result<Option<PathBuf>> {
        if self.listing.is_empty() {
            self.refresh_listing()?;
        }
        if self.listing.is_empty() {
            return Ok(None);
        }

        let index = self.prompter.select(label, self.listing.len())?;
        Ok(index.map(|i| self.listing[i].relative_path.clone()))
    }

    /// Report an outcome and re-list, so item numbers match the tree again
    fn finish(&mut self, outcome: OperationOutcome) -> Result<()> {
        let prefix = if outcome.success { "OK" } else { "Error" };
        writeln!(self.prompter.output(), "{}: {}", prefix, outcome.message)?;
        self.refresh_listing()
    }
}
