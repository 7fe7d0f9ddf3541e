/// Client-side views. These are not server endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Welcome,
    Form,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Welcome => "/",
            Route::Form => "/form",
        }
    }

    /// Unknown paths land on the welcome view.
    pub fn from_path(path: &str) -> Route {
        match path.trim_end_matches('/') {
            "/form" => Route::Form,
            _ => Route::Welcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    route: Route,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self {
            route: Route::Welcome,
        }
    }

    pub fn at(path: &str) -> Self {
        Self {
            route: Route::from_path(path),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Welcome -> form.
    pub fn proceed(&mut self) {
        if self.route == Route::Welcome {
            self.route = Route::Form;
        }
    }

    /// Form -> welcome.
    pub fn back(&mut self) {
        if self.route == Route::Form {
            self.route = Route::Welcome;
        }
    }

    pub fn navigate(&mut self, path: &str) {
        self.route = Route::from_path(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_welcome() {
        assert_eq!(Shell::new().route(), Route::Welcome);
        assert_eq!(Shell::new().route().path(), "/");
    }

    #[test]
    fn proceed_and_back() {
        let mut shell = Shell::new();
        shell.proceed();
        assert_eq!(shell.route(), Route::Form);
        shell.proceed();
        assert_eq!(shell.route(), Route::Form);
        shell.back();
        assert_eq!(shell.route(), Route::Welcome);
        shell.back();
        assert_eq!(shell.route(), Route::Welcome);
    }

    #[test]
    fn paths_resolve() {
        assert_eq!(Route::from_path("/form"), Route::Form);
        assert_eq!(Route::from_path("/form/"), Route::Form);
        assert_eq!(Route::from_path("/"), Route::Welcome);
        assert_eq!(Route::from_path("/admin"), Route::Welcome);
        assert_eq!(Shell::at(Route::Form.path()).route(), Route::Form);

        let mut shell = Shell::new();
        shell.navigate("/form");
        assert_eq!(shell.route(), Route::Form);
    }
}
