//! Navigation router for screen transitions

use super::Navigation;

/// Logical screens
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Home,
    PinLock,
    PinSetup,
    Profile,
    BankAccounts,
    AddBankAccount,
}

impl Route {
    /// Title for breadcrumb
    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Home => "Home",
            Route::PinLock => "Enter Your PIN",
            Route::PinSetup => "PIN Setup",
            Route::Profile => "Profile",
            Route::BankAccounts => "Bank Accounts",
            Route::AddBankAccount => "Add Bank Account",
        }
    }
}

/// Router manages navigation history
pub struct Router {
    /// Navigation history stack
    history: Vec<Route>,
    /// Maximum history depth
    max_depth: usize,
}

impl Router {
    /// Create a router showing `initial`
    pub fn new(initial: Route) -> Self {
        Self {
            history: vec![initial],
            max_depth: 20,
        }
    }

    /// Push a new route onto the history
    pub fn push(&mut self, route: Route) {
        // Limit history depth
        if self.history.len() >= self.max_depth {
            self.history.remove(0);
        }
        self.history.push(route);
    }

    /// Swap the current route for another
    pub fn replace(&mut self, route: Route) {
        self.history.pop();
        self.history.push(route);
    }

    /// Go back to the previous screen; the root screen stays put
    pub fn back(&mut self) -> Route {
        if self.can_go_back() {
            self.history.pop();
        }
        self.current()
    }

    /// Apply a navigation request and return the screen now shown
    pub fn apply(&mut self, navigation: Navigation) -> Route {
        match navigation {
            Navigation::Back => return self.back(),
            Navigation::Replace(route) => self.replace(route),
            Navigation::Push(route) => self.push(route),
        }
        tracing::debug!("Navigated to {:?}", self.current());
        self.current()
    }

    /// Get the current route
    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or(Route::Login)
    }

    /// Get the breadcrumb trail
    pub fn breadcrumb(&self) -> Vec<&'static str> {
        self.history.iter().map(|r| r.title()).collect()
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::PinLock)
    }
}
