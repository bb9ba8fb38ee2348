//! Одностраничный интерфейс

/// Примеры текста для демонстрации
pub const EXAMPLE_TEXTS: [&str; 4] = [
    "Hello! This is a test of the voice cloning system. How do I sound?",
    "Welcome to our AI voice cloning demo. This technology can replicate voices with just a short audio sample.",
    "The quick brown fox jumps over the lazy dog. This sentence contains every letter of the alphabet.",
    "In a world where technology advances rapidly, voice cloning represents a fascinating frontier in artificial intelligence.",
];

/// Страница с формой. Языки и примеры подгружаются из API.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>XTTS Voice Cloner</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 1200px; margin: auto; padding: 1rem; }
  .header { text-align: center; margin-bottom: 2rem; }
  .info-box { background: #f0f9ff; padding: 1rem; border-radius: 8px; border-left: 4px solid #0ea5e9; margin: 1rem 0; }
  .columns { display: flex; gap: 2rem; flex-wrap: wrap; }
  .column { flex: 1; min-width: 320px; }
  textarea, select, input[type=file] { width: 100%; margin-bottom: 1rem; }
  #status { white-space: pre-wrap; background: #f8fafc; padding: 1rem; border-radius: 6px; min-height: 6em; }
  progress { width: 100%; }
  button.primary { font-size: 1.1em; padding: 0.6em 1.2em; }
  footer { text-align: center; margin-top: 2rem; padding: 1rem; border-top: 1px solid #e5e7eb; color: #6b7280; }
</style>
</head>
<body>
<div class="header">
  <h1>XTTS Voice Cloner</h1>
  <p>Upload your voice, enter text, get AI speech!</p>
</div>
<div class="info-box">
  <h3>How to use:</h3>
  <ol>
    <li><strong>Upload Reference Audio:</strong> a clear 3-30 second recording of the target voice</li>
    <li><strong>Enter Text:</strong> what you want the AI to say (up to 1000 characters)</li>
    <li><strong>Select Language:</strong> the language for speech generation</li>
    <li><strong>Generate</strong> and wait for the result</li>
  </ol>
  <p><strong>Tips:</strong> use high-quality audio with minimal background noise for best results.</p>
</div>
<div class="columns">
  <div class="column">
    <h3>Inputs</h3>
    <form id="clone-form">
      <label>Reference Audio (wav, mp3, flac, m4a, ogg)</label>
      <input type="file" name="reference_audio" accept=".wav,.mp3,.flac,.m4a,.ogg">
      <label>Text to Convert to Speech</label>
      <textarea name="text" id="text" rows="6" placeholder="Enter the text you want the AI to speak..."></textarea>
      <label>Language</label>
      <select name="language" id="language"></select>
      <button type="submit" class="primary">Generate Cloned Voice</button>
    </form>
    <h4>Example Texts:</h4>
    <div id="examples"></div>
  </div>
  <div class="column">
    <h3>Results</h3>
    <progress id="progress" max="100" value="0"></progress>
    <div id="stage"></div>
    <div id="status"></div>
    <audio id="player" controls style="width:100%; margin-top:1rem"></audio>
    <p><a id="download" href="#" download hidden>Download generated speech</a></p>
  </div>
</div>
<footer>Powered by <strong>XTTS v2</strong></footer>
<script>
async function init() {
  const languages = await (await fetch('/api/languages')).json();
  const select = document.getElementById('language');
  for (const lang of languages) {
    const option = new Option(lang.name, lang.code, lang.code === 'en', lang.code === 'en');
    select.add(option);
  }
  const examples = await (await fetch('/api/examples')).json();
  const box = document.getElementById('examples');
  examples.forEach((text, i) => {
    const button = document.createElement('button');
    button.type = 'button';
    button.textContent = 'Example ' + (i + 1);
    button.onclick = () => { document.getElementById('text').value = text; };
    box.appendChild(button);
  });
}

function show(job) {
  document.getElementById('progress').value = job.progress;
  document.getElementById('stage').textContent = job.stage;
  document.getElementById('status').textContent = job.status;
  const link = document.getElementById('download');
  if (job.audio_url) {
    document.getElementById('player').src = job.audio_url;
    link.href = job.audio_url;
    link.hidden = false;
  }
}

async function poll(id) {
  const response = await fetch('/api/jobs/' + id);
  const job = await response.json();
  show(job);
  if (!job.done) setTimeout(() => poll(id), 500);
}

document.getElementById('clone-form').addEventListener('submit', async (event) => {
  event.preventDefault();
  document.getElementById('download').hidden = true;
  document.getElementById('player').removeAttribute('src');
  const response = await fetch('/api/clone', { method: 'POST', body: new FormData(event.target) });
  const body = await response.json();
  if (!response.ok) {
    document.getElementById('status').textContent = body.error || 'Request failed';
    return;
  }
  poll(body.job_id);
});

init();
</script>
</body>
</html>
"##;
