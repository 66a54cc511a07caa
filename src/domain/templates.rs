//! Built-in sandbox documents.

/// Blank document installed by the "clear" action.
pub const DEFAULT_MARKUP: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    <title>My Website</title>\n</head>\n<body>\n    \n</body>\n</html>";

/// Style rules installed alongside [`DEFAULT_MARKUP`].
pub const DEFAULT_STYLE: &str = "";

/// Markup of the "card" example.
pub const EXAMPLE_MARKUP: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Card</title>
</head>
<body>
    <div class="card">
        <h2>Card</h2>
        <p>This is an example of a card component with modern styling.</p>
        <button class="btn">Learn More</button>
    </div>
</body>
</html>"#;

/// Style rules of the "card" example.
pub const EXAMPLE_STYLE: &str = r#"body {
    margin: 0;
    padding: 40px;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    font-family: 'Arial', sans-serif;
    min-height: 100vh;
    display: flex;
    align-items: center;
    justify-content: center;
}

.card {
    background: white;
    padding: 2rem;
    border-radius: 16px;
    box-shadow: 0 10px 30px rgba(0,0,0,0.2);
    text-align: center;
    max-width: 400px;
    transform: translateY(0);
    transition: all 0.3s ease;
}

.card:hover {
    transform: translateY(-10px);
    box-shadow: 0 20px 40px rgba(0,0,0,0.3);
}

h2 {
    color: #2d3748;
    margin-bottom: 1rem;
    font-size: 1.8rem;
}

p {
    color: #4a5568;
    margin-bottom: 2rem;
    line-height: 1.6;
}

.btn {
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: white;
    border: none;
    padding: 12px 24px;
    border-radius: 25px;
    font-weight: 600;
    cursor: pointer;
    transition: all 0.3s ease;
}

.btn:hover {
    transform: translateY(-2px);
    box-shadow: 0 8px 20px rgba(102, 126, 234, 0.4);
}"#;
