use thiserror::Error;

/// Marker replaced by the user's game concept when a template is rendered.
pub const CONCEPT_PLACEHOLDER: &str = "{game_concept}";

/// Instructions asking the model for a complete Love2D `main.lua`.
pub const LUA_GAME_TEMPLATE: &str = r#"
Generate a complete main.lua file for a Love2D game based on the following concept: {game_concept}.
Your primary goal is to create a simple but playable game experience using the roles and behaviors defined below.

1.  **Entity Identification and Role Assignment:**
    *   From the game concept (e.g., "a knight collects coins and fights a patrolling goblin"), identify all key game entities (knight, coins, goblin).
    *   For each entity, assign one of the roles defined below (e.g., knight -> PLAYER_CHARACTER, coins -> ITEM_COLLECTIBLE_STATIC, goblin -> ENEMY_SIMPLE_PATROL).
    *   Use the entity's name from the prompt for its Lua table and asset filename (e.g., if the prompt mentions 'brave knight', the Lua table could be `knight` and it loads 'assets/knight.png'). All asset names should be lowercase.
    *   If the prompt implies multiple instances of an entity (e.g., "three coins"), create a list of tables for them (e.g., `coins = {{...}}, {{...}}, {{...}}`).

2.  **Defined Entity Roles and Standard Behaviors:**

    A.  **`PLAYER_CHARACTER` Role:**
        *   **Purpose:** The main controllable entity. Typically, there is only one player character.
        *   **Asset:** Load from `assets/[player_entity_name_lowercase].png`.
        *   **Initialization (`love.load`):**
            *   Create a Lua table for the player (e.g., `player = {}` or `hero = {}` based on the prompt's naming).
            *   Load its image, get `width` and `height` from the image.
            *   Set initial position (e.g., `player.x`, `player.y`), often centered: `x = (800 - width) / 2`, `y = (600 - height) / 2`.
            *   Set `player.speed = 200`.
        *   **Update (`love.update(dt)`):**
            *   Implement movement controls using W (up), A (left), S (down), D (right) keys.
            *   Ensure the player does not move off-screen (boundary checks for an 800x600 window).
        *   **Drawing (`love.draw`):** Draw the player's image at its current `x, y` position.

    B.  **`ENEMY_SIMPLE_PATROL` Role:**
        *   **Purpose:** A basic enemy that moves back and forth horizontally.
        *   **Asset:** Load from `assets/[enemy_entity_name_lowercase].png`.
        *   **Initialization (`love.load`):**
            *   Create a Lua table (or list of tables if multiple) for the enemy (e.g., `goblin = {}`).
            *   Load its image, get `width` and `height`.
            *   Set initial position (e.g., `enemy.x = 100`, `enemy.y = 400`).
            *   Set `enemy.speed = 50`, `enemy.direction = 1` (1 for right, -1 for left).
            *   Define patrol boundaries, e.g., `enemy.patrol_min_x = 50`, `enemy.patrol_max_x = 300`.
        *   **Update (`love.update(dt)`):**
            *   Move horizontally: `enemy.x = enemy.x + enemy.speed * enemy.direction * dt`.
            *   If `enemy.x < enemy.patrol_min_x` or `enemy.x + enemy.width > enemy.patrol_max_x`, reverse `enemy.direction`.
            *   **Collision with `PLAYER_CHARACTER`:**
                *   Implement Axis-Aligned Bounding Box (AABB) collision detection. (A collision occurs if `e1.x < e2.x + e2.width` and `e1.x + e1.width > e2.x` and `e1.y < e2.y + e2.height` and `e1.y + e1.height > e2.y`).
                *   On collision, set `game_state = "game_over"`.
        *   **Drawing (`love.draw`):** Draw the enemy's image.

    C.  **`ITEM_COLLECTIBLE_STATIC` Role:**
        *   **Purpose:** An item the player can collect. It remains stationary.
        *   **Asset:** Load from `assets/[item_entity_name_lowercase].png`.
        *   **Initialization (`love.load`):**
            *   Create a Lua table (or list of tables if multiple) for the item (e.g., `coin = {}`).
            *   Load its image, get `width` and `height`.
            *   Set a fixed position (e.g., `item.x = 500`, `item.y = 300`).
            *   Set `item.visible = true`.
        *   **Update (`love.update(dt)`):**
            *   If `item.visible == true`, check for AABB collision with `PLAYER_CHARACTER`.
            *   On collision: Set `item.visible = false` and increment `score` by 10 (e.g., `score = score + 10`).
        *   **Drawing (`love.draw`):** If `item.visible == true`, draw the item's image.

3.  **Game State and General Logic:**
    *   In `love.load()`:
        *   Initialize `game_state = "playing"`.
        *   Initialize `score = 0`.
    *   In `love.update(dt)`:
        *   Only run entity updates (movement, collision checks) if `game_state == "playing"`.
    *   In `love.draw()`:
        *   Draw all visible game entities.
        *   Display the current `score` (e.g., `love.graphics.print("Score: " .. score, 10, 10)`).
        *   If `game_state == "game_over"`, display a "Game Over" message prominently (e.g., `love.graphics.print("Game Over!", 350, 280)`).

4.  **Standard Love2D Structure:**
    *   Include all necessary Love2D callback functions: `love.load()`, `love.update(dt)`, `love.draw()`.
    *   You may also include `love.keypressed(key)` for an "escape to quit" feature.
    *   Assume an 800x600 window. Do not generate `conf.lua`.

5.  **Code Style and Completeness:**
    *   Ensure all variables (entity tables, images, positions, dimensions, game_state, score, etc.) are properly initialized in `love.load()` before use.
    *   The Lua code must be complete and runnable in Love2D.
    *   If the user's prompt implies entities or behaviors not fitting the defined roles, make a reasonable attempt to include them as static sprites or apply the closest matching role's behavior if appropriate. Prioritize creating an interactive experience.

Output only the Lua code for main.lua. Do not include any other explanatory text or markdown formatting around the code.
"#;

const _: () = assert!(
    count_occurrences(LUA_GAME_TEMPLATE, CONCEPT_PLACEHOLDER) == 1,
    "LUA_GAME_TEMPLATE must contain exactly one concept placeholder"
);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template does not contain the {{game_concept}} placeholder")]
    MissingPlaceholder,
    #[error("template contains the {{game_concept}} placeholder {count} times, expected once")]
    DuplicatePlaceholder { count: usize },
}

/// An instruction template holding exactly one [`CONCEPT_PLACEHOLDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    text: &'static str,
}

impl PromptTemplate {
    /// The built-in Love2D template. Its placeholder count is checked at compile time.
    pub const fn lua_game() -> Self {
        Self {
            text: LUA_GAME_TEMPLATE,
        }
    }

    pub fn parse(text: &'static str) -> Result<Self, TemplateError> {
        match count_occurrences(text, CONCEPT_PLACEHOLDER) {
            0 => Err(TemplateError::MissingPlaceholder),
            1 => Ok(Self { text }),
            count => Err(TemplateError::DuplicatePlaceholder { count }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.text
    }

    /// Substitute `concept` verbatim at the placeholder.
    ///
    /// The concept is inserted once and never re-scanned, so a concept that
    /// itself contains the placeholder text is kept as is.
    pub fn render(&self, concept: &str) -> String {
        self.text.replacen(CONCEPT_PLACEHOLDER, concept, 1)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::lua_game()
    }
}

/// Build the Love2D instruction prompt for a game concept.
pub fn craft_prompt(concept: &str) -> String {
    PromptTemplate::lua_game().render(concept)
}

const fn count_occurrences(haystack: &str, needle: &str) -> usize {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut start = 0;
    while start + needle.len() <= haystack.len() {
        let mut matched = 0;
        while matched < needle.len() && haystack[start + matched] == needle[matched] {
            matched += 1;
        }

        if matched == needle.len() {
            count += 1;
            start += needle.len();
        } else {
            start += 1;
        }
    }
    count
}
